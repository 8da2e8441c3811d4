use aho_corasick::AhoCorasick;
use regex_syntax::{hir::literal::Extractor, parse};

use crate::error::Result;

/// Literals shorter than this are too common in UA strings to gate anything.
const MIN_LITERAL_LEN: usize = 3;

/// Literal token gate applied before the detection regexes run.
///
/// Each rule contributes the prefix literals of its pattern ("Chrome/",
/// "Version/", "Opera ", …). One Aho-Corasick pass over the UA marks the
/// rules whose literal occurred; only those get their regex executed. Rules
/// whose pattern yields no usable literal are always candidates.
pub(crate) struct TokenPrefilter {
    automaton: AhoCorasick,
    /// Maps automaton pattern index → rule index.
    literal_to_rule: Vec<usize>,
    /// Rule indices that must be tried on every input.
    always: Vec<usize>,
    rule_count: usize,
}

impl TokenPrefilter {
    pub fn build(patterns: &[&str]) -> Result<Self> {
        let mut literals: Vec<String> = Vec::new();
        let mut literal_to_rule: Vec<usize> = Vec::new();
        let mut always: Vec<usize> = Vec::new();

        for (rule_idx, pattern) in patterns.iter().enumerate() {
            let lits = extract_literals(pattern, MIN_LITERAL_LEN);
            if lits.is_empty() {
                always.push(rule_idx);
                continue;
            }
            for lit in lits {
                literals.push(lit);
                literal_to_rule.push(rule_idx);
            }
        }

        let automaton = AhoCorasick::new(&literals)?;
        Ok(Self {
            automaton,
            literal_to_rule,
            always,
            rule_count: patterns.len(),
        })
    }

    /// Mark which rules may match `ua`. Output is indexed by rule.
    pub fn candidates(&self, ua: &str) -> Vec<bool> {
        let mut out = vec![false; self.rule_count];
        for &idx in &self.always {
            out[idx] = true;
        }
        // Overlapping search: two rules may share a substring ("Opera/"
        // contains "Opera"), and every owner of a hit literal must be marked.
        for hit in self.automaton.find_overlapping_iter(ua) {
            out[self.literal_to_rule[hit.pattern().as_usize()]] = true;
        }
        out
    }
}

/// Extract literal substrings from a regex pattern for use as Aho-Corasick
/// pre-filter candidates. Returns literals of at least `min_len` bytes,
/// or an empty vec if none are found (meaning the rule must always be tried).
///
/// Uses `regex_syntax::hir::literal::Extractor` for correct handling of all
/// regex constructs. If the pattern cannot be parsed (e.g. exotic PCRE-isms
/// unsupported by regex_syntax), returns empty → the rule becomes an
/// "always candidate" that is checked on every input. Case is preserved:
/// the detection patterns are case-sensitive, so the gate must be too.
fn extract_literals(pattern: &str, min_len: usize) -> Vec<String> {
    let hir = match parse(pattern) {
        Ok(h) => h,
        Err(_) => return Vec::new(),
    };

    let mut extractor = Extractor::new();
    extractor.kind(regex_syntax::hir::literal::ExtractKind::Prefix);

    let seq = extractor.extract(&hir);
    seq.literals()
        .into_iter()
        .flatten()
        .filter_map(|lit| {
            let s = std::str::from_utf8(lit.as_bytes()).ok()?;
            if s.len() >= min_len {
                Some(s.to_string())
            } else {
                None
            }
        })
        .collect()
}
