mod config;
mod controller;
mod detector;
mod engine;
mod error;
mod prefilter;
mod resolver;
mod rules;
mod store;
mod types;

pub use config::{PopupConfig, PopupOptions};
pub use controller::{FeedbackPopup, Renderer, ShowOutcome};
pub use detector::BrowserDetector;
pub use engine::{Decision, ShowDecisionEngine};
pub use error::{Error, Result};
pub use resolver::{resolve, FALLBACK_URL};
pub use store::{HistoryStore, JsonFileHistoryStore, MemoryHistoryStore, TimestampMs, HISTORY_KEY};
pub use types::*;
