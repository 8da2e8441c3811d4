use fancy_regex::Regex;

use crate::error::Result;
use crate::prefilter::TokenPrefilter;
use crate::rules::{BrowserRule, BROWSER_RULES};
use crate::types::{Browser, BrowserFlags};

/// Compiled User-Agent detector.
///
/// Construction compiles the rule table once; detection is infallible.
/// A pattern that errors mid-match on some input counts as a non-match,
/// and an empty or unrecognized UA yields all-false flags.
pub struct BrowserDetector {
    rules: Vec<CompiledRule>,
    prefilter: TokenPrefilter,
}

struct CompiledRule {
    browser: Browser,
    regex: Regex,
}

impl BrowserDetector {
    pub fn new() -> Result<Self> {
        let mut rules = Vec::with_capacity(BROWSER_RULES.len());
        for BrowserRule { browser, pattern } in BROWSER_RULES {
            rules.push(CompiledRule {
                browser: *browser,
                regex: Regex::new(pattern)?,
            });
        }

        let patterns: Vec<&str> = BROWSER_RULES.iter().map(|rule| rule.pattern).collect();
        let prefilter = TokenPrefilter::build(&patterns)?;

        Ok(Self { rules, prefilter })
    }

    /// Match `user_agent` against the rule table and return the raised flags.
    ///
    /// Legacy Edge UA strings also carry Chrome tokens (and Gecko-compatible
    /// fragments), so an Edge match suppresses the Chrome and Firefox flags.
    /// Safari and Opera are left untouched: the Safari rule already rejects
    /// Edge strings on its own, and Blink-era Opera is reported alongside
    /// Chrome deliberately.
    pub fn detect(&self, user_agent: &str) -> BrowserFlags {
        let mut flags = BrowserFlags::default();
        if user_agent.is_empty() {
            return flags;
        }

        let candidates = self.prefilter.candidates(user_agent);
        for (idx, rule) in self.rules.iter().enumerate() {
            if !candidates[idx] || flags.get(rule.browser) {
                continue;
            }
            if rule.regex.is_match(user_agent).unwrap_or(false) {
                flags.set(rule.browser);
            }
        }

        if flags.edge {
            flags.chrome = false;
            flags.firefox = false;
        }

        flags
    }
}
