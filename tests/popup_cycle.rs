use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use feedback_popup::{
    Browser, Decision, Error, FeedbackPopup, HistoryStore, JsonFileHistoryStore,
    MemoryHistoryStore, PopupOptions, Prompt, PromptHooks, Renderer, Result, ShowOutcome,
    StoreLink, StoreLinkTable, TimestampMs, FALLBACK_URL, HISTORY_KEY,
};

const CHROME_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const FIREFOX_UA: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:122.0) Gecko/20100101 Firefox/122.0";

const CHROME_LINK: &str = "https://chromewebstore.example/detail/feedback-popup";
const FIREFOX_LINK: &str = "https://addons.example/firefox/feedback-popup";

/// Pushes every rendered button URL into a shared list and fires both hooks,
/// the way a real modal would on mount and dismissal.
struct RecordingRenderer {
    rendered: Arc<Mutex<Vec<String>>>,
}

impl RecordingRenderer {
    fn new() -> (Self, Arc<Mutex<Vec<String>>>) {
        let rendered = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                rendered: rendered.clone(),
            },
            rendered,
        )
    }
}

impl Renderer for RecordingRenderer {
    fn present(&self, prompt: &Prompt<'_>, hooks: &PromptHooks) -> Result<()> {
        self.rendered
            .lock()
            .unwrap()
            .push(prompt.button.url.clone());
        hooks.notify_open();
        hooks.notify_close();
        Ok(())
    }
}

struct FailingRenderer;

impl Renderer for FailingRenderer {
    fn present(&self, _prompt: &Prompt<'_>, _hooks: &PromptHooks) -> Result<()> {
        Err(Error::Render("modal could not mount".to_string()))
    }
}

/// Yields to the scheduler before every answer, so overlapping cycles would
/// interleave between read and append unless the controller serializes them.
struct YieldingStore {
    inner: MemoryHistoryStore,
}

#[async_trait]
impl HistoryStore for YieldingStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<TimestampMs>>> {
        tokio::task::yield_now().await;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, history: &[TimestampMs]) -> Result<()> {
        tokio::task::yield_now().await;
        self.inner.set(key, history).await
    }
}

/// Reads fine (no history) but refuses every write.
struct ReadOnlyStore;

#[async_trait]
impl HistoryStore for ReadOnlyStore {
    async fn get(&self, _key: &str) -> Result<Option<Vec<TimestampMs>>> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _history: &[TimestampMs]) -> Result<()> {
        Err(Error::Store("write refused".to_string()))
    }
}

fn options(install_date: i64) -> PopupOptions {
    let mut store_links = StoreLinkTable::default();
    store_links.insert(Browser::Chrome, StoreLink::new(CHROME_LINK, "chrome.svg"));
    store_links.insert(Browser::Firefox, StoreLink::new(FIREFOX_LINK, "firefox.svg"));
    PopupOptions {
        headline: "Enjoying the extension?".to_string(),
        text: "A quick rating helps others find it.".to_string(),
        install_date,
        store_links,
        logo: None,
        button_label: None,
        timeout_ms: None,
        frequency: None,
        theme: None,
    }
}

fn an_hour_ago() -> i64 {
    Utc::now().timestamp_millis() - 3_600_000
}

#[tokio::test]
async fn shows_once_then_frequency_holds() {
    let store = Arc::new(MemoryHistoryStore::new());
    let (renderer, rendered) = RecordingRenderer::new();
    let popup = FeedbackPopup::new(options(an_hour_ago()), store.clone(), renderer).unwrap();

    let outcome = popup.maybe_show(CHROME_UA).await.unwrap();
    assert!(matches!(outcome, ShowOutcome::Shown));
    assert_eq!(rendered.lock().unwrap()[0], CHROME_LINK);
    assert_eq!(store.get(HISTORY_KEY).await.unwrap().unwrap().len(), 1);

    // Two milliseconds on the clock so the timeout gate is past and the
    // frequency gate is the one that answers.
    tokio::time::sleep(Duration::from_millis(2)).await;
    let outcome = popup.maybe_show(CHROME_UA).await.unwrap();
    assert!(matches!(
        outcome,
        ShowOutcome::NotDue(Decision::FrequencyExhausted)
    ));
    assert_eq!(rendered.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn concurrent_cycles_render_exactly_once() {
    let (renderer, rendered) = RecordingRenderer::new();
    let store = Arc::new(YieldingStore {
        inner: MemoryHistoryStore::new(),
    });
    let popup = Arc::new(FeedbackPopup::new(options(an_hour_ago()), store, renderer).unwrap());

    let mut cycles = Vec::new();
    for _ in 0..16 {
        let popup = popup.clone();
        cycles.push(tokio::spawn(async move { popup.maybe_show(CHROME_UA).await }));
    }

    let mut shown = 0;
    let mut held_back = 0;
    for cycle in cycles {
        match cycle.await.unwrap().unwrap() {
            ShowOutcome::Shown => shown += 1,
            ShowOutcome::NotDue(_) => held_back += 1,
            outcome => panic!("unexpected outcome: {outcome:?}"),
        }
    }

    // All sixteen cycles raced over one empty history with frequency 1;
    // serialization means a single render, not sixteen.
    assert_eq!(shown, 1);
    assert_eq!(held_back, 15);
    assert_eq!(rendered.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn nothing_renders_before_the_timeout() {
    let store = Arc::new(MemoryHistoryStore::new());
    let (renderer, rendered) = RecordingRenderer::new();
    let mut opts = options(Utc::now().timestamp_millis());
    opts.timeout_ms = Some(60_000);
    let popup = FeedbackPopup::new(opts, store.clone(), renderer).unwrap();

    let outcome = popup.maybe_show(CHROME_UA).await.unwrap();
    assert!(matches!(
        outcome,
        ShowOutcome::NotDue(Decision::TimeoutPending)
    ));
    assert!(rendered.lock().unwrap().is_empty());
    assert_eq!(store.get(HISTORY_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn link_follows_the_detected_browser() {
    let store = Arc::new(MemoryHistoryStore::new());
    let (renderer, rendered) = RecordingRenderer::new();
    let mut opts = options(an_hour_ago());
    opts.frequency = Some(5);
    let popup = FeedbackPopup::new(opts, store, renderer).unwrap();

    popup.maybe_show(FIREFOX_UA).await.unwrap();
    let rendered = rendered.lock().unwrap();
    assert_eq!(rendered.len(), 1);
    assert_eq!(rendered[0], FIREFOX_LINK);
}

#[tokio::test]
async fn unknown_ua_still_renders_with_fallback_link() {
    let store = Arc::new(MemoryHistoryStore::new());
    let (renderer, rendered) = RecordingRenderer::new();
    let popup = FeedbackPopup::new(options(an_hour_ago()), store, renderer).unwrap();

    let outcome = popup.maybe_show("not a browser at all").await.unwrap();
    assert!(matches!(outcome, ShowOutcome::Shown));
    assert_eq!(rendered.lock().unwrap()[0], FALLBACK_URL);
}

#[tokio::test]
async fn render_failure_leaves_history_untouched() {
    let store = Arc::new(MemoryHistoryStore::new());
    let popup = FeedbackPopup::new(options(an_hour_ago()), store.clone(), FailingRenderer).unwrap();

    let result = popup.maybe_show(CHROME_UA).await;
    assert!(matches!(result, Err(Error::Render(_))));
    assert_eq!(store.get(HISTORY_KEY).await.unwrap(), None);

    // The failed attempt spent nothing: the prompt is still due.
    tokio::time::sleep(Duration::from_millis(2)).await;
    let (renderer, rendered) = RecordingRenderer::new();
    let popup = FeedbackPopup::new(options(an_hour_ago()), store, renderer).unwrap();
    let outcome = popup.maybe_show(CHROME_UA).await.unwrap();
    assert!(matches!(outcome, ShowOutcome::Shown));
    assert_eq!(rendered.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn write_failure_reports_shown_not_recorded() {
    let (renderer, rendered) = RecordingRenderer::new();
    let popup = FeedbackPopup::new(options(an_hour_ago()), Arc::new(ReadOnlyStore), renderer).unwrap();

    let outcome = popup.maybe_show(CHROME_UA).await.unwrap();
    assert!(matches!(
        outcome,
        ShowOutcome::ShownNotRecorded(Error::Store(_))
    ));
    // The prompt did reach the screen.
    assert_eq!(rendered.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn hooks_fire_once_per_show() {
    let opened = Arc::new(AtomicUsize::new(0));
    let closed = Arc::new(AtomicUsize::new(0));

    let (renderer, _rendered) = RecordingRenderer::new();
    let popup = FeedbackPopup::new(
        options(an_hour_ago()),
        Arc::new(MemoryHistoryStore::new()),
        renderer,
    )
    .unwrap()
    .on_open({
        let opened = opened.clone();
        Arc::new(move || {
            opened.fetch_add(1, Ordering::SeqCst);
        })
    })
    .on_close({
        let closed = closed.clone();
        Arc::new(move || {
            closed.fetch_add(1, Ordering::SeqCst);
        })
    });

    popup.maybe_show(CHROME_UA).await.unwrap();
    assert_eq!(opened.load(Ordering::SeqCst), 1);
    assert_eq!(closed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn file_backed_history_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("popup/history.json");
    let install = an_hour_ago();

    {
        let (renderer, rendered) = RecordingRenderer::new();
        let store = Arc::new(JsonFileHistoryStore::new(&path));
        let popup = FeedbackPopup::new(options(install), store, renderer).unwrap();
        let outcome = popup.maybe_show(CHROME_UA).await.unwrap();
        assert!(matches!(outcome, ShowOutcome::Shown));
        assert_eq!(rendered.lock().unwrap().len(), 1);
    }

    tokio::time::sleep(Duration::from_millis(2)).await;

    // A fresh controller over the same file sees the earlier show.
    let (renderer, rendered) = RecordingRenderer::new();
    let store = Arc::new(JsonFileHistoryStore::new(&path));
    let popup = FeedbackPopup::new(options(install), store, renderer).unwrap();
    let outcome = popup.maybe_show(CHROME_UA).await.unwrap();
    assert!(matches!(
        outcome,
        ShowOutcome::NotDue(Decision::FrequencyExhausted)
    ));
    assert!(rendered.lock().unwrap().is_empty());
}

#[tokio::test]
async fn negative_configuration_is_rejected_up_front() {
    let mut opts = options(an_hour_ago());
    opts.timeout_ms = Some(-5);
    let (renderer, _rendered) = RecordingRenderer::new();
    let result = FeedbackPopup::new(opts, Arc::new(MemoryHistoryStore::new()), renderer);
    assert!(matches!(result, Err(Error::Config(_))));
}
