//! Console rendering of a snapshot run.

use crate::models::{BrowserFieldResult, ExtractionResult};
use std::time::Duration;

const RULE_WIDTH: usize = 40;

pub fn format_result_line(result: &ExtractionResult) -> String {
    let name = &result.target.display_name;
    match result.value() {
        Some(value) => format!("{:<25} : {:>8}", name, value),
        None => format!("{:<25} :  Error", name),
    }
}

pub fn format_field_line(result: &BrowserFieldResult) -> String {
    format!("{:<25} : {}", result.field.label, result.text)
}

pub fn format_elapsed(elapsed: Duration) -> String {
    format!("Completato in {:.2} secondi.", elapsed.as_secs_f64())
}

pub fn print_category(category: &str, results: &[ExtractionResult]) {
    println!("\n📊 Rendimenti per {}:", category);
    println!("{}", "-".repeat(RULE_WIDTH));
    for r in results {
        println!("{}", format_result_line(r));
    }
}

pub fn print_debt_clock(results: &[BrowserFieldResult]) {
    println!("\n Debt Clock:");
    println!("{}", "-".repeat(RULE_WIDTH));
    for r in results {
        println!("{}", format_field_line(r));
    }
}

pub fn print_elapsed(elapsed: Duration) {
    println!("\n {}", format_elapsed(elapsed));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BrowserField, FailureKind, FetchTarget};

    fn target() -> FetchTarget {
        FetchTarget::new("Spagna", "https://es.investing.com/rates-bonds/spain-10-year-bond-yield")
    }

    #[test]
    fn test_value_line() {
        let line = format_result_line(&ExtractionResult::found(target(), "3.45".into()));
        assert_eq!(line, format!("{:<25} : {:>8}", "Spain 10 Year", "3.45"));
        assert!(line.ends_with("    3.45"));
    }

    #[test]
    fn test_error_line_ignores_failure_kind() {
        let a = format_result_line(&ExtractionResult::failed(target(), FailureKind::HttpStatus(403)));
        let b = format_result_line(&ExtractionResult::failed(target(), FailureKind::SelectorMiss));
        assert_eq!(a, b);
        assert!(a.ends_with(":  Error"));
    }

    #[test]
    fn test_field_line_and_elapsed() {
        let field = BrowserField {
            label: "Spain Debt".into(),
            element_id: "J2a1463MMJ".into(),
            timeout_ms: 5_000,
        };
        let line = format_field_line(&BrowserFieldResult::read(field, "€1,625,883,012,004".into()));
        assert_eq!(line, format!("{:<25} : €1,625,883,012,004", "Spain Debt"));

        assert_eq!(format_elapsed(Duration::from_millis(12_340)), "Completato in 12.34 secondi.");
    }
}
