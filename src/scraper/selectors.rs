use crate::config::SelectorRule;
use anyhow::Result;
use scraper::{Html, Selector};

/// One compiled rule for locating the value-bearing element.
#[derive(Debug, Clone)]
pub struct SelectorStrategy {
    pub name: String,
    selector: Selector,
}

impl SelectorStrategy {
    pub fn new(name: &str, css: &str) -> Result<Self> {
        let selector = Selector::parse(css)
            .map_err(|e| anyhow::anyhow!("selector {} ({}): {:?}", name, css, e))?;
        Ok(Self {
            name: name.to_string(),
            selector,
        })
    }

    pub fn compile_all(rules: &[SelectorRule]) -> Result<Vec<Self>> {
        rules.iter().map(|r| Self::new(&r.name, &r.css)).collect()
    }
}

/// Outcome of applying the strategy list to one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorMatch {
    /// First matching rule and its trimmed text, which may be empty.
    Hit { rule: String, text: String },
    Miss,
}

/// Apply `strategies` in order; the first rule matching any element wins,
/// even when that element's text is empty.
pub fn first_match(html: &str, strategies: &[SelectorStrategy]) -> SelectorMatch {
    let doc = Html::parse_document(html);

    for strategy in strategies {
        if let Some(el) = doc.select(&strategy.selector).next() {
            return SelectorMatch::Hit {
                rule: strategy.name.clone(),
                text: el.text().collect::<String>().trim().to_string(),
            };
        }
    }

    SelectorMatch::Miss
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScraperConfig;

    fn defaults() -> Vec<SelectorStrategy> {
        SelectorStrategy::compile_all(&ScraperConfig::default().selectors).unwrap()
    }

    #[test]
    fn test_primary_wins_over_fallback() {
        let html = r#"<div data-test="instrument-price-last"> 3.45 </div><span id="last_last">9.99</span>"#;
        assert_eq!(
            first_match(html, &defaults()),
            SelectorMatch::Hit { rule: "instrument-price-last".into(), text: "3.45".into() }
        );
    }

    #[test]
    fn test_fallback_used_when_primary_absent() {
        let html = r#"<html><body><span id="last_last">2.10</span></body></html>"#;
        assert_eq!(
            first_match(html, &defaults()),
            SelectorMatch::Hit { rule: "legacy-last-last".into(), text: "2.10".into() }
        );
    }

    #[test]
    fn test_empty_primary_does_not_fall_through() {
        let html = r#"<div data-test="instrument-price-last">  </div><span id="last_last">2.10</span>"#;
        assert_eq!(
            first_match(html, &defaults()),
            SelectorMatch::Hit { rule: "instrument-price-last".into(), text: String::new() }
        );
    }

    #[test]
    fn test_miss() {
        assert_eq!(first_match("<p>nothing here</p>", &defaults()), SelectorMatch::Miss);
        assert_eq!(first_match("", &defaults()), SelectorMatch::Miss);
    }

    #[test]
    fn test_invalid_rule_is_rejected() {
        assert!(SelectorStrategy::new("broken", "div[[").is_err());
    }
}
