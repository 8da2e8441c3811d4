use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::Result;
use crate::store::{HistoryStore, TimestampMs, HISTORY_KEY};

/// Outcome of one gate evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Both gates passed; the prompt may be shown now.
    Show,
    /// Not enough time has elapsed since install or the last show.
    TimeoutPending,
    /// The prompt has already been shown its allowed number of times.
    FrequencyExhausted,
}

/// Decides whether the prompt is due, combining the install date, the
/// elapsed timeout and the persisted shown history.
///
/// The engine holds no mutable state: a decision is a pure function of
/// `(history, now)` plus the fixed install date, timeout and frequency.
/// Callers that interleave evaluation with recording must serialize whole
/// cycles per history key; the controller does so with a mutex.
pub struct ShowDecisionEngine {
    store: Arc<dyn HistoryStore>,
    install_date_ms: TimestampMs,
    timeout_ms: i64,
    frequency: u32,
}

impl ShowDecisionEngine {
    /// `timeout_ms` and `frequency` must already be validated (>= 0, >= 1);
    /// see [`PopupOptions::validate`](crate::PopupOptions::validate).
    pub fn new(
        store: Arc<dyn HistoryStore>,
        install_date_ms: TimestampMs,
        timeout_ms: i64,
        frequency: u32,
    ) -> Self {
        Self {
            store,
            install_date_ms,
            timeout_ms,
            frequency,
        }
    }

    /// Pure gate evaluation: timeout first, then frequency.
    ///
    /// The timeout anchors on the later of the install date and the last
    /// recorded show, and passes only on strictly greater elapsed time. Zero
    /// elapsed never passes, even with a zero timeout.
    pub fn decide(&self, history: &[TimestampMs], now_ms: TimestampMs) -> Decision {
        let reference = match history.last() {
            Some(&last) => last.max(self.install_date_ms),
            None => self.install_date_ms,
        };

        if now_ms.saturating_sub(reference) <= self.timeout_ms {
            return Decision::TimeoutPending;
        }
        if history.len() >= self.frequency as usize {
            return Decision::FrequencyExhausted;
        }
        Decision::Show
    }

    /// Read the history and evaluate the gates at `now_ms`.
    pub async fn evaluate(&self, now_ms: TimestampMs) -> Decision {
        let history = self.read_history().await;
        let decision = self.decide(&history, now_ms);
        debug!(?decision, shown = history.len(), "evaluated show gates");
        decision
    }

    pub async fn should_show(&self, now_ms: TimestampMs) -> bool {
        self.evaluate(now_ms).await == Decision::Show
    }

    /// Append `now_ms` to the shown history.
    ///
    /// Call once per prompt actually rendered, after rendering: a failed
    /// render must never mark a show. A failed write is returned as-is; the
    /// history is then short one entry and the prompt may show once more in
    /// the next eligible window.
    pub async fn record_shown(&self, now_ms: TimestampMs) -> Result<()> {
        let mut history = self.read_history().await;
        if let Some(&last) = history.last() {
            if now_ms < last {
                warn!(now_ms, last, "clock went backwards between shows");
            }
        }
        history.push(now_ms);
        self.store.set(HISTORY_KEY, &history).await
    }

    /// Single fallback point for unreadable histories: a store that cannot
    /// answer counts as having no history, so the next evaluation behaves
    /// like a first-ever prompt. The degradation is logged here and nowhere
    /// else.
    async fn read_history(&self) -> Vec<TimestampMs> {
        match self.store.get(HISTORY_KEY).await {
            Ok(Some(history)) => history,
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "history read failed, treating as empty");
                Vec::new()
            }
        }
    }
}
