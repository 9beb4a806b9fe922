//! Forbidden-pattern scan over generated source.

use loom_core::Validation;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::templates::{EXPORT_MARKER, LIBRARY_IMPORT_SOURCE, UNIT_NAME};

/// Tailwind arbitrary-value classes (`bg-[#fff]`, `text-[13px]`, ...).
static ARBITRARY_CLASS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"className="[^"]*\b(bg-\[|text-\[|border-\[)"#)
        .expect("arbitrary class pattern is valid")
});

/// Scan generated source for style overrides and required markers.
///
/// All checks run; each failing check contributes one message.
pub fn validate_code(code: &str) -> Validation {
    let mut errors = Vec::new();

    if code.contains("style=") || code.contains("style =") {
        errors.push("Inline styles detected".to_string());
    }

    if ARBITRARY_CLASS.is_match(code) {
        errors.push("Arbitrary Tailwind values detected".to_string());
    }

    if !code.contains(&format!("from '{}'", LIBRARY_IMPORT_SOURCE)) {
        errors.push("Missing component library import".to_string());
    }

    if !code.contains(EXPORT_MARKER) {
        errors.push(format!("Missing {} function export", UNIT_NAME));
    }

    Validation::from_errors(errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = "import { Card } from '@/components/library';\n\
                           export default function GeneratedUI() { return <Card />; }";

    #[test]
    fn minimal_unit_is_valid() {
        let result = validate_code(MINIMAL);
        assert!(result.valid, "{:?}", result.errors);
    }

    #[test]
    fn detects_inline_style_both_spellings() {
        let a = validate_code(&format!("{}\n<div style={{{{}}}} />", MINIMAL));
        assert_eq!(a.errors, vec!["Inline styles detected"]);
        let b = validate_code(&format!("{}\n<div style = {{{{}}}} />", MINIMAL));
        assert_eq!(b.errors, vec!["Inline styles detected"]);
    }

    #[test]
    fn detects_arbitrary_tailwind_values() {
        for class in ["bg-[#ff0000]", "p-4 text-[13px]", "border-[3px] flex"] {
            let code = format!("{}\n<div className=\"{}\" />", MINIMAL, class);
            let result = validate_code(&code);
            assert_eq!(
                result.errors,
                vec!["Arbitrary Tailwind values detected"],
                "class {}",
                class
            );
        }
    }

    #[test]
    fn ordinary_classes_pass() {
        let code = format!("{}\n<div className=\"min-h-screen bg-gray-50 text-sm\" />", MINIMAL);
        assert!(validate_code(&code).valid);
    }

    #[test]
    fn reports_every_failure_in_order() {
        let result = validate_code("<div style={{}} className=\"bg-[red]\" />");
        assert!(!result.valid);
        assert_eq!(
            result.errors,
            vec![
                "Inline styles detected",
                "Arbitrary Tailwind values detected",
                "Missing component library import",
                "Missing GeneratedUI function export",
            ]
        );
    }
}
