//! Fixed list of pages to watch.
//!
//! Categories run in the order of `CATEGORIES`; targets inside a category keep
//! the order listed here, which is also the order they are printed in.

use crate::models::{BrowserField, FetchTarget};
use url::Url;

pub const URLS_SPAIN: &[&str] = &[
    "https://es.investing.com/rates-bonds/spain-9-month",
    "https://es.investing.com/rates-bonds/spain-6-month-bond-yield",
    "https://es.investing.com/rates-bonds/spain-3-month-bond-yield",
    "https://es.investing.com/rates-bonds/spain-30-year-bond-yield",
    "https://es.investing.com/rates-bonds/spain-25-year",
    "https://es.investing.com/rates-bonds/spain-20-year-bond-yield",
    "https://es.investing.com/rates-bonds/spain-15-year-bond-yield",
    "https://es.investing.com/rates-bonds/spain-10-year-bond-yield",
    "https://es.investing.com/rates-bonds/spain-9-year-bond-yield",
    "https://es.investing.com/rates-bonds/spain-5-year-bond-yield",
    "https://es.investing.com/rates-bonds/spain-4-year-bond-yield",
    "https://es.investing.com/rates-bonds/spain-3-year-bond-yield",
    "https://es.investing.com/rates-bonds/spain-2-year-bond-yield",
    "https://es.investing.com/rates-bonds/spain-1-year-bond-yield",
];

pub const URLS_ITALY: &[&str] = &[
    "https://es.investing.com/rates-bonds/italy-3-month-bond-yield",
    "https://es.investing.com/rates-bonds/italy-1-month",
    "https://es.investing.com/rates-bonds/italy-30-year",
    "https://es.investing.com/rates-bonds/italy-10-year-bond-yield",
    "https://es.investing.com/rates-bonds/italy-5-year-bond-yield",
    "https://es.investing.com/rates-bonds/italy-4-year-bond-yield",
    "https://es.investing.com/rates-bonds/italy-3-year-bond-yield",
    "https://es.investing.com/rates-bonds/italy-2-year-bond-yield",
    "https://es.investing.com/rates-bonds/italy-1-year-bond-yield",
];

pub const URLS_USA: &[&str] = &[
    "https://es.investing.com/rates-bonds/u.s.-1-month-bond-yield",
    "https://es.investing.com/rates-bonds/u.s.-3-month-bond-yield",
    "https://es.investing.com/rates-bonds/u.s.-6-month-bond-yield",
    "https://es.investing.com/rates-bonds/u.s.-1-year-bond-yield",
    "https://es.investing.com/rates-bonds/u.s.-2-year-bond-yield",
    "https://es.investing.com/rates-bonds/u.s.-3-year-bond-yield",
    "https://es.investing.com/rates-bonds/u.s.-5-year-bond-yield",
    "https://es.investing.com/rates-bonds/u.s.-7-year-bond-yield",
    "https://es.investing.com/rates-bonds/u.s.-10-year-bond-yield",
    "https://es.investing.com/rates-bonds/u.s.-30-year-bond-yield",
];

pub const CATEGORIES: &[(&str, &[&str])] = &[
    ("Spagna", URLS_SPAIN),
    ("Italia", URLS_ITALY),
    ("USA", URLS_USA),
];

pub const DEBT_CLOCK_URL: &str = "https://www.usdebtclock.org/world-debt-clock.html";

const DEBT_FIELDS: &[(&str, &str)] = &[("USA Debt", "X2a5BWRG"), ("Spain Debt", "J2a1463MMJ")];

/// Trailing slug tokens that carry no information in a label.
const SUFFIX_TOKENS: &[&str] = &["bond", "yield"];

/// Targets of one category, in catalog order.
pub fn targets(category: &str, urls: &[&str]) -> Vec<FetchTarget> {
    urls.iter().map(|url| FetchTarget::new(category, url)).collect()
}

/// Debt clock fields, each bounded by `timeout_ms`.
pub fn debt_fields(timeout_ms: u64) -> Vec<BrowserField> {
    DEBT_FIELDS
        .iter()
        .map(|(label, id)| BrowserField {
            label: label.to_string(),
            element_id: id.to_string(),
            timeout_ms,
        })
        .collect()
}

/// Human-readable label from the last path segment of a URL.
/// "…/u.s.-10-year-bond-yield" → "U.S. 10 Year" | "…/spain-9-month" → "Spain 9 Month"
pub fn display_name(url: &str) -> String {
    let slug = Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|mut segs| segs.rfind(|s| !s.is_empty()).map(|s| s.to_string()))
        })
        .unwrap_or_default();

    let mut words: Vec<&str> = slug
        .split(|c| c == '-' || c == '_')
        .filter(|w| !w.is_empty())
        .collect();

    if words.len() > SUFFIX_TOKENS.len() {
        let tail = &words[words.len() - SUFFIX_TOKENS.len()..];
        if tail
            .iter()
            .zip(SUFFIX_TOKENS)
            .all(|(w, s)| w.eq_ignore_ascii_case(s))
        {
            words.truncate(words.len() - SUFFIX_TOKENS.len());
        }
    }

    let name = title_case(&words.join(" "));
    if name.is_empty() { url.to_string() } else { name }
}

/// Uppercase a letter that follows a non-letter, lowercase the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}
