use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Browser {
    Chrome,
    Firefox,
    Safari,
    Edge,
    Opera,
}

impl Browser {
    /// Tie-break order when a UA matches several families at once. Chrome
    /// wins all ties: multi-engine UA strings (Chrome-based browsers carry
    /// Safari tokens too) resolve to the most specific, most common entry.
    pub const PRECEDENCE: [Browser; 5] = [
        Browser::Chrome,
        Browser::Firefox,
        Browser::Safari,
        Browser::Edge,
        Browser::Opera,
    ];

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "chrome" => Some(Self::Chrome),
            "firefox" => Some(Self::Firefox),
            "safari" => Some(Self::Safari),
            "edge" => Some(Self::Edge),
            "opera" => Some(Self::Opera),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chrome => "chrome",
            Self::Firefox => "firefox",
            Self::Safari => "safari",
            Self::Edge => "edge",
            Self::Opera => "opera",
        }
    }
}

/// Wire names are the lowercase family names, as link-table keys
/// (`"storeLinks": {"chrome": …}`). Input is case-tolerant, output canonical.
impl Serialize for Browser {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Browser {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Browser::from_str(&s).ok_or_else(|| {
            de::Error::unknown_variant(&s, &["chrome", "firefox", "safari", "edge", "opera"])
        })
    }
}

/// Browser families matched in one User-Agent string.
///
/// Flags are not mutually exclusive: a Chrome UA also carries Safari version
/// tokens, legacy Edge carries Chrome tokens, and so on. Collapsing the set
/// to a single family is the link resolver's job, not the detector's.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserFlags {
    pub chrome: bool,
    pub firefox: bool,
    pub safari: bool,
    pub edge: bool,
    pub opera: bool,
}

impl BrowserFlags {
    pub fn get(&self, browser: Browser) -> bool {
        match browser {
            Browser::Chrome => self.chrome,
            Browser::Firefox => self.firefox,
            Browser::Safari => self.safari,
            Browser::Edge => self.edge,
            Browser::Opera => self.opera,
        }
    }

    pub(crate) fn set(&mut self, browser: Browser) {
        match browser {
            Browser::Chrome => self.chrome = true,
            Browser::Firefox => self.firefox = true,
            Browser::Safari => self.safari = true,
            Browser::Edge => self.edge = true,
            Browser::Opera => self.opera = true,
        }
    }

    /// True when no family matched at all (empty or unrecognized UA).
    pub fn is_empty(&self) -> bool {
        !(self.chrome || self.firefox || self.safari || self.edge || self.opera)
    }

    /// Matched families, yielded in precedence order.
    pub fn matched(&self) -> impl Iterator<Item = Browser> + '_ {
        Browser::PRECEDENCE.iter().copied().filter(|b| self.get(*b))
    }
}
