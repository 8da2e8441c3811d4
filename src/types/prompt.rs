use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

/// Everything a renderer needs to mount the prompt. Headline, text and logo
/// borrow from the controller's configuration; the button is assembled per
/// cycle from the resolved store link.
#[derive(Debug, Clone)]
pub struct Prompt<'a> {
    pub headline: &'a str,
    pub text: &'a str,
    /// Logo image source; empty when the caller supplied none.
    pub logo: &'a str,
    pub button: PromptButton,
    pub theme: Theme,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptButton {
    pub label: String,
    pub url: String,
    /// Store badge image source; empty when the resolved link had none.
    pub icon: String,
}

pub type PromptCallback = Arc<dyn Fn() + Send + Sync>;

/// Lifecycle callbacks forwarded to the renderer. Both default to no-ops;
/// the renderer is expected to fire `on_open` once the modal is mounted and
/// `on_close` when the user dismisses it.
#[derive(Clone, Default)]
pub struct PromptHooks {
    pub on_open: Option<PromptCallback>,
    pub on_close: Option<PromptCallback>,
}

impl PromptHooks {
    pub fn notify_open(&self) {
        if let Some(f) = &self.on_open {
            f();
        }
    }

    pub fn notify_close(&self) {
        if let Some(f) = &self.on_close {
            f();
        }
    }
}

impl fmt::Debug for PromptHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromptHooks")
            .field("on_open", &self.on_open.is_some())
            .field("on_close", &self.on_close.is_some())
            .finish()
    }
}
