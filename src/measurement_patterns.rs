//! # Measurement Patterns Module
//!
//! This module contains the regex patterns used by the recipe and ingredient parsers.

use lazy_static::lazy_static;
use regex::Regex;

/// Amount notations, most specific first: "2 i 1/2", "1 1/2", "1/3", "1,5" / "1.5"
pub const AMOUNT_PATTERN: &str =
    r"(?:[0-9]+\s+i\s+[0-9]+/[0-9]+|[0-9]+\s+[0-9]+/[0-9]+|[0-9]+/[0-9]+|[0-9]+(?:[.,][0-9]+)?)";

/// Weight/volume annotation such as "(200g)" or "(ok. 250 ml)"
pub const PARENTHETICAL_PATTERN: &str =
    r"(?i)\(\s*(?:ok\.?\s*)?[0-9]+(?:[.,][0-9]+)?\s*(?:kg|g|ml|l)\s*\)";

lazy_static! {
    /// Mixed fraction joined by the word "i": "2 i 1/2"
    pub static ref MIXED_WORD_REGEX: Regex =
        Regex::new(r"^([0-9]+)\s+i\s+([0-9]+)/([0-9]+)$").expect("Mixed fraction pattern should be valid");

    /// Mixed fraction joined by a space: "1 1/2"
    pub static ref MIXED_SPACE_REGEX: Regex =
        Regex::new(r"^([0-9]+)\s+([0-9]+)/([0-9]+)$").expect("Mixed fraction pattern should be valid");

    /// Simple fraction: "1/3"
    pub static ref FRACTION_REGEX: Regex =
        Regex::new(r"^([0-9]+)/([0-9]+)$").expect("Fraction pattern should be valid");

    /// Decimal with either separator: "1,5", "0.25", "500"
    pub static ref DECIMAL_REGEX: Regex =
        Regex::new(r"^[0-9]+(?:[.,][0-9]+)?$").expect("Decimal pattern should be valid");

    /// `<name> - <amount> [<unit>] [(<note>)]`
    pub static ref REVERSED_AMOUNT_REGEX: Regex = Regex::new(&format!(
        r"(?i)^(?P<name>.+?)\s+[-–—]\s+(?P<amount>{AMOUNT_PATTERN})(?:\s*(?P<unit>[^\s()]+))?\s*(?:\((?P<note>[^)]*)\))?\s*$"
    ))
    .expect("Reversed ingredient pattern should be valid");

    /// `<name> - ([ok.] <number><g|kg|ml|l>)`
    pub static ref REVERSED_PARENTHETICAL_REGEX: Regex = Regex::new(
        r"(?i)^(?P<name>.+?)\s+[-–—]\s+\(\s*(?:ok\.?\s*)?(?P<amount>[0-9]+(?:[.,][0-9]+)?)\s*(?P<unit>kg|g|ml|l)\s*\)\s*$"
    )
    .expect("Reversed parenthetical pattern should be valid");

    /// Annotations stripped from ingredient names
    pub static ref PARENTHETICAL_REGEX: Regex =
        Regex::new(PARENTHETICAL_PATTERN).expect("Parenthetical pattern should be valid");

    /// Leading list marker: "- " or "* "
    pub static ref BULLET_REGEX: Regex =
        Regex::new(r"^[-*](?:\s+|$)").expect("Bullet pattern should be valid");

    /// Horizontal rule separating recipes
    pub static ref SEPARATOR_REGEX: Regex =
        Regex::new(r"(?m)^[ \t]*-{3,}[ \t]*$").expect("Separator pattern should be valid");

    /// Top-level heading carrying the recipe name
    pub static ref TITLE_REGEX: Regex =
        Regex::new(r"(?m)^#[ \t]+(.+?)[ \t]*$").expect("Title pattern should be valid");

    /// Second-level heading opening a named section
    pub static ref SECTION_HEADING_REGEX: Regex =
        Regex::new(r"^##[ \t]*(.*?)[ \t]*$").expect("Section heading pattern should be valid");

    /// First integer anywhere in a value: "ok. 15 min" -> 15
    pub static ref FIRST_INTEGER_REGEX: Regex =
        Regex::new(r"[0-9]+").expect("Integer pattern should be valid");

    /// Integer prefix of a value: "4 osoby" -> 4
    pub static ref LEADING_INTEGER_REGEX: Regex =
        Regex::new(r"^[0-9]+").expect("Integer pattern should be valid");

    /// Runs of whitespace collapsed after stripping annotations
    pub static ref WHITESPACE_REGEX: Regex =
        Regex::new(r"\s+").expect("Whitespace pattern should be valid");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reversed_amount_captures() {
        let caps = REVERSED_AMOUNT_REGEX
            .captures("mąka pszenna - 200 g (ok. 1 szklanka)")
            .unwrap();
        assert_eq!(&caps["name"], "mąka pszenna");
        assert_eq!(&caps["amount"], "200");
        assert_eq!(&caps["unit"], "g");
        assert_eq!(&caps["note"], "ok. 1 szklanka");
    }

    #[test]
    fn test_reversed_parenthetical_captures() {
        let caps = REVERSED_PARENTHETICAL_REGEX
            .captures("ser żółty - (150g)")
            .unwrap();
        assert_eq!(&caps["name"], "ser żółty");
        assert_eq!(&caps["amount"], "150");
        assert_eq!(&caps["unit"], "g");
    }

    #[test]
    fn test_separator_needs_three_hyphens() {
        assert!(SEPARATOR_REGEX.is_match("a\n---\nb"));
        assert!(SEPARATOR_REGEX.is_match("a\n  -----  \nb"));
        assert!(!SEPARATOR_REGEX.is_match("a\n--\nb"));
        assert!(!SEPARATOR_REGEX.is_match("- --- x"));
    }

    #[test]
    fn test_title_is_single_hash_only() {
        assert!(TITLE_REGEX.captures("## Info").is_none());
        assert_eq!(&TITLE_REGEX.captures("# Zupa").unwrap()[1], "Zupa");
    }

    #[test]
    fn test_bullet_markers() {
        assert!(BULLET_REGEX.is_match("- mąka"));
        assert!(BULLET_REGEX.is_match("* mąka"));
        assert!(BULLET_REGEX.is_match("-"));
        assert!(!BULLET_REGEX.is_match("-5 stopni"));
    }
}
