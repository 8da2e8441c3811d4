use crate::types::Browser;

/// One User-Agent matching rule: a regex whose match raises `browser`'s
/// flag. Several rules may target the same family (Chrome has desktop and
/// iOS tokens, Opera has Presto- and Blink-era tokens).
pub(crate) struct BrowserRule {
    pub browser: Browser,
    pub pattern: &'static str,
}

/// Detection rule table. Patterns are case-sensitive: UA tokens are
/// fixed-case identifiers, not free text.
pub(crate) const BROWSER_RULES: &[BrowserRule] = &[
    BrowserRule {
        browser: Browser::Chrome,
        pattern: r"Chrome/([\d.]+)",
    },
    BrowserRule {
        browser: Browser::Chrome,
        pattern: r"CriOS/([\d.]+)",
    },
    BrowserRule {
        browser: Browser::Firefox,
        pattern: r"Firefox/([\d.]+)",
    },
    // Safari advertises its real version behind "Version/"; bare WebKit or
    // Mobile-only strings must not count as Safari.
    BrowserRule {
        browser: Browser::Safari,
        pattern: r"Version/([\d.]+)([^S](Safari)|[^M]*(Mobile)[^S]*(Safari))",
    },
    // Legacy (EdgeHTML) UA strings end in "Edge/<version>"; the version has
    // a two-digit major and may carry several dotted components.
    BrowserRule {
        browser: Browser::Edge,
        pattern: r"Edge/(\d{2,}\.[\d\w.]+)$",
    },
    // Presto-era Opera: "Opera/9.80 (…)" or "Opera 9.6".
    BrowserRule {
        browser: Browser::Opera,
        pattern: r"Opera[/ ]([\d.]+)",
    },
    // Blink-era Opera piggybacks on a Chrome UA and appends "OPR/<version>".
    BrowserRule {
        browser: Browser::Opera,
        pattern: r"(Chrome)(.+)OPR/([\d.]+)",
    },
];
