//! Verdict parsing for Stage 3.
//!
//! The judge is asked to close its evaluation with the exact phrase
//! `BEST RESPONSE: Response X`. That phrase contract is inherited from
//! observed judge behavior and deliberately NOT made stricter or looser:
//! anything that doesn't match falls back to the first refined result,
//! with the reason recorded on the final selection. Pure text scanning,
//! no I/O.

/// Why the final selection degraded to the fallback candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// The judge call itself returned nothing.
    EvaluationFailed,
    /// The judge responded but no selection could be extracted, or the
    /// extracted letter was outside the candidate range.
    Unparseable,
}

impl FallbackReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FallbackReason::EvaluationFailed => {
                "Evaluation failed, selected first response as fallback"
            }
            FallbackReason::Unparseable => "Could not parse best response selection",
        }
    }
}

/// Extract the selected letter from a judge verdict.
///
/// Matches `BEST RESPONSE:`, optional whitespace, the word `Response`,
/// optional whitespace, then a single letter — all case-insensitive.
/// Returns the first match, uppercased.
pub fn parse_selection(verdict: &str) -> Option<char> {
    let upper = verdict.to_uppercase();
    let mut remaining = upper.as_str();

    while let Some(pos) = remaining.find("BEST RESPONSE:") {
        let after = &remaining[pos + "BEST RESPONSE:".len()..];
        let after = after.trim_start();
        if let Some(rest) = after.strip_prefix("RESPONSE") {
            let rest = rest.trim_start();
            if let Some(letter) = rest.chars().next()
                && letter.is_ascii_uppercase()
            {
                return Some(letter);
            }
        }
        remaining = &remaining[pos + 1..];
    }

    None
}

/// Map a selection letter to a zero-based candidate index.
pub fn letter_index(letter: char) -> usize {
    (letter.to_ascii_uppercase() as u8 - b'A') as usize
}

/// Resolve a verdict against a candidate list of the given length.
///
/// Returns the selected index, or `None` when the verdict carries no
/// parseable in-range selection.
pub fn resolve_selection(verdict: &str, candidate_count: usize) -> Option<usize> {
    let letter = parse_selection(verdict)?;
    let index = letter_index(letter);
    (index < candidate_count).then_some(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exact_phrase() {
        let verdict = "After careful comparison...\n\nBEST RESPONSE: Response C";
        assert_eq!(parse_selection(verdict), Some('C'));
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(parse_selection("best response: response b"), Some('B'));
        assert_eq!(parse_selection("Best Response: Response d"), Some('D'));
    }

    #[test]
    fn test_parse_embedded_mid_text() {
        let verdict = "I considered all options. BEST RESPONSE: Response A. Done.";
        assert_eq!(parse_selection(verdict), Some('A'));
    }

    #[test]
    fn test_parse_requires_response_word() {
        // The inherited contract requires the literal word after the colon.
        assert_eq!(parse_selection("BEST RESPONSE: C"), None);
    }

    #[test]
    fn test_parse_no_match() {
        assert_eq!(parse_selection("I like option 3 the most."), None);
        assert_eq!(parse_selection(""), None);
    }

    #[test]
    fn test_parse_tight_whitespace() {
        assert_eq!(parse_selection("BEST RESPONSE:Response B"), Some('B'));
    }

    #[test]
    fn test_resolve_in_range() {
        assert_eq!(resolve_selection("BEST RESPONSE: Response C", 4), Some(2));
    }

    #[test]
    fn test_resolve_out_of_range_is_none() {
        // Letter F against 4 candidates: parsed but unusable.
        assert_eq!(resolve_selection("BEST RESPONSE: Response F", 4), None);
    }

    #[test]
    fn test_letter_index_ordinals() {
        assert_eq!(letter_index('A'), 0);
        assert_eq!(letter_index('D'), 3);
        assert_eq!(letter_index('Z'), 25);
    }

    #[test]
    fn test_fallback_reason_strings() {
        assert!(FallbackReason::EvaluationFailed.as_str().contains("fallback"));
        assert!(FallbackReason::Unparseable.as_str().contains("parse"));
    }
}
