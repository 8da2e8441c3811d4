use super::Browser;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One outbound store target: where the review button points and which store
/// badge to show next to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreLink {
    pub url: String,
    #[serde(default)]
    pub icon: String,
}

impl StoreLink {
    pub fn new(url: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            icon: icon.into(),
        }
    }
}

/// Caller-supplied mapping from browser family to store target.
/// Uses IndexMap to preserve insertion order: the resolver falls back to the
/// first defined entry when the detected family has no mapping.
pub type StoreLinkTable = IndexMap<Browser, StoreLink>;
