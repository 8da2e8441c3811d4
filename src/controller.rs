use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::{PopupConfig, PopupOptions};
use crate::detector::BrowserDetector;
use crate::engine::{Decision, ShowDecisionEngine};
use crate::error::{Error, Result};
use crate::resolver;
use crate::store::HistoryStore;
use crate::types::{Prompt, PromptButton, PromptCallback, PromptHooks};

/// Render boundary. Implementations own every presentation concern: modal
/// markup, theme palette, backdrop, dismissal handling. They are expected to
/// fire `hooks.notify_open` once the prompt is mounted and
/// `hooks.notify_close` when the user dismisses it.
pub trait Renderer: Send + Sync {
    fn present(&self, prompt: &Prompt<'_>, hooks: &PromptHooks) -> Result<()>;
}

/// What one `maybe_show` cycle did.
#[derive(Debug)]
pub enum ShowOutcome {
    /// A gate held the prompt back; nothing was rendered. Never carries
    /// [`Decision::Show`].
    NotDue(Decision),
    /// Rendered, and the shown timestamp was persisted.
    Shown,
    /// Rendered, but persisting the shown timestamp failed. The prompt is
    /// already on screen and cannot be rolled back; it may show once more
    /// in the next eligible window.
    ShownNotRecorded(Error),
}

/// Orchestrates one prompt lifecycle: gate evaluation, browser detection,
/// link resolution, rendering and history append, in that order.
pub struct FeedbackPopup<R: Renderer> {
    config: PopupConfig,
    detector: BrowserDetector,
    engine: ShowDecisionEngine,
    renderer: R,
    hooks: PromptHooks,
    /// Serializes whole read→decide→render→append cycles. Two concurrent
    /// evaluations must not both read a pre-append history and both show.
    cycle: Mutex<()>,
}

impl<R: Renderer> FeedbackPopup<R> {
    pub fn new(options: PopupOptions, store: Arc<dyn HistoryStore>, renderer: R) -> Result<Self> {
        let config = options.validate()?;
        let detector = BrowserDetector::new()?;
        let engine = ShowDecisionEngine::new(
            store,
            config.install_date_ms,
            config.timeout_ms,
            config.frequency,
        );

        Ok(Self {
            config,
            detector,
            engine,
            renderer,
            hooks: PromptHooks::default(),
            cycle: Mutex::new(()),
        })
    }

    pub fn on_open(mut self, callback: PromptCallback) -> Self {
        self.hooks.on_open = Some(callback);
        self
    }

    pub fn on_close(mut self, callback: PromptCallback) -> Self {
        self.hooks.on_close = Some(callback);
        self
    }

    /// Evaluate the gates and, when the prompt is due, render it for the
    /// given User-Agent and record the show.
    ///
    /// An `Err` from the renderer propagates without touching the history.
    /// A failed history write after a successful render is reported as
    /// [`ShowOutcome::ShownNotRecorded`], not as an error: the prompt was
    /// seen either way.
    pub async fn maybe_show(&self, user_agent: &str) -> Result<ShowOutcome> {
        let _cycle = self.cycle.lock().await;

        let decision = self.engine.evaluate(Utc::now().timestamp_millis()).await;
        if decision != Decision::Show {
            debug!(?decision, "prompt not due");
            return Ok(ShowOutcome::NotDue(decision));
        }

        let flags = self.detector.detect(user_agent);
        let link = resolver::resolve(&flags, &self.config.store_links);
        debug!(flags = ?flags, url = %link.url, "resolved review target");

        let prompt = Prompt {
            headline: &self.config.headline,
            text: &self.config.text,
            logo: &self.config.logo,
            button: PromptButton {
                label: self.config.button_label.clone(),
                url: link.url,
                icon: link.icon,
            },
            theme: self.config.theme,
        };

        self.renderer.present(&prompt, &self.hooks)?;
        info!(url = %prompt.button.url, theme = %prompt.theme.as_str(), "feedback prompt shown");

        match self.engine.record_shown(Utc::now().timestamp_millis()).await {
            Ok(()) => Ok(ShowOutcome::Shown),
            Err(e) => {
                warn!(error = %e, "prompt shown but history write failed");
                Ok(ShowOutcome::ShownNotRecorded(e))
            }
        }
    }
}
