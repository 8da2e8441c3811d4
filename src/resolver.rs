use crate::types::{BrowserFlags, StoreLink, StoreLinkTable};

/// Review target when no browser family was identified, or the caller
/// supplied no usable link table. A missing or unparseable UA must never
/// break rendering.
pub const FALLBACK_URL: &str = "https://www.google.com";

/// Collapse matched flags into one outbound link.
///
/// Ties break by [`Browser::PRECEDENCE`](crate::Browser::PRECEDENCE) (Chrome
/// first). A matched family
/// missing from the table falls back to the table's first entry in
/// insertion order; no match at all falls back to [`FALLBACK_URL`].
pub fn resolve(flags: &BrowserFlags, table: &StoreLinkTable) -> StoreLink {
    let browser = match flags.matched().next() {
        Some(browser) => browser,
        None => return fallback_link(),
    };

    if let Some(link) = table.get(&browser) {
        return link.clone();
    }

    match table.first() {
        Some((_, link)) => link.clone(),
        None => fallback_link(),
    }
}

fn fallback_link() -> StoreLink {
    StoreLink::new(FALLBACK_URL, "")
}
