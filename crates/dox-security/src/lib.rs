//! PII masking for paragraph text
//!
//! An ordered table of (pattern, token) rules. Each rule rewrites the output
//! of the previous one, so a digit run already turned into `[CARD]` is never
//! seen by the phone rule.

use std::sync::LazyLock;

use dox_core::{Error, Result};
use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};

pub const CARD_TOKEN: &str = "[CARD]";
pub const PHONE_TOKEN: &str = "[PHONE]";
pub const EMAIL_TOKEN: &str = "[EMAIL]";

/// Built-in rules, applied in this order.
static BUILTIN_RULES: LazyLock<Vec<RedactionRule>> = LazyLock::new(|| {
    vec![
        // Payment card lengths
        RedactionRule::builtin(r"\b\d{12,19}\b", CARD_TOKEN),
        RedactionRule::builtin(r"\+?\d{7,15}", PHONE_TOKEN),
        RedactionRule::builtin(r"\S+@\S+\.\S+", EMAIL_TOKEN),
    ]
});

/// How many substitutions one token received
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionCount {
    pub token: String,
    pub count: usize,
}

/// A single pattern and the literal that replaces its matches
#[derive(Debug, Clone)]
pub struct RedactionRule {
    pattern: Regex,
    token: String,
}

impl RedactionRule {
    /// Compile a rule from a regex pattern
    pub fn new(pattern: &str, token: impl Into<String>) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| Error::InvalidRule {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            pattern: regex,
            token: token.into(),
        })
    }

    fn builtin(pattern: &str, token: &str) -> Self {
        Self {
            pattern: Regex::new(pattern).unwrap(),
            token: token.to_string(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

/// Masks card numbers, phone numbers and email addresses
#[derive(Debug, Clone)]
pub struct PiiMasker {
    rules: Vec<RedactionRule>,
}

impl PiiMasker {
    /// Masker with the built-in rule table
    pub fn new() -> Self {
        Self {
            rules: BUILTIN_RULES.clone(),
        }
    }

    /// Append rules that run after the built-in ones, in the given order
    pub fn with_rules(mut self, extra: impl IntoIterator<Item = RedactionRule>) -> Self {
        self.rules.extend(extra);
        self
    }

    pub fn rules(&self) -> &[RedactionRule] {
        &self.rules
    }

    /// Redact every rule's matches from `text`
    pub fn mask(&self, text: &str) -> String {
        self.mask_with_counts(text).0
    }

    /// Redact and report how many matches each token replaced
    pub fn mask_with_counts(&self, text: &str) -> (String, Vec<RedactionCount>) {
        let mut counts = Vec::new();
        if text.is_empty() {
            return (String::new(), counts);
        }

        let mut result = text.to_string();
        for rule in &self.rules {
            let count = rule.pattern.find_iter(&result).count();

            if count > 0 {
                result = rule
                    .pattern
                    .replace_all(&result, NoExpand(&rule.token))
                    .into_owned();

                counts.push(RedactionCount {
                    token: rule.token.clone(),
                    count,
                });
            }
        }

        (result, counts)
    }
}

impl Default for PiiMasker {
    fn default() -> Self {
        Self::new()
    }
}

/// Fold `more` into `total`, keeping first-seen token order
pub fn merge_counts(total: &mut Vec<RedactionCount>, more: Vec<RedactionCount>) {
    for item in more {
        match total.iter_mut().find(|c| c.token == item.token) {
            Some(existing) => existing.count += item.count,
            None => total.push(item),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask(text: &str) -> String {
        PiiMasker::new().mask(text)
    }

    fn count(token: &str, count: usize) -> RedactionCount {
        RedactionCount {
            token: token.to_string(),
            count,
        }
    }

    #[test]
    fn test_phone_redaction() {
        assert_eq!(mask("Call 5551234567"), "Call [PHONE]");
        assert_eq!(mask("Call +15551234567 now"), "Call [PHONE] now");
    }

    #[test]
    fn test_card_never_tagged_as_phone() {
        let masked = mask("Card: 4111111111111111.");
        assert_eq!(masked, "Card: [CARD].");
        assert!(!masked.contains(PHONE_TOKEN));
        assert!(!masked.contains("4111111111111111"));
    }

    #[test]
    fn test_card_length_bounds() {
        // 12 and 19 digits are cards, 11 digits falls through to phone
        assert_eq!(mask("123456789012"), "[CARD]");
        assert_eq!(mask("1234567890123456789"), "[CARD]");
        assert_eq!(mask("12345678901"), "[PHONE]");
    }

    #[test]
    fn test_overlong_digit_run_falls_to_phone_rule() {
        // 20 digits have no word boundary inside, so the card rule cannot match
        assert_eq!(mask("12345678901234567890"), "[PHONE]67890");
    }

    #[test]
    fn test_plus_prefixed_card_length() {
        assert_eq!(mask("+441234567890"), "+[CARD]");
    }

    #[test]
    fn test_short_numbers_untouched() {
        assert_eq!(mask("Room 123456, floor 2"), "Room 123456, floor 2");
    }

    #[test]
    fn test_email_consumes_whole_token() {
        assert_eq!(mask("write to jane.doe@example.com today"), "write to [EMAIL] today");
        assert_eq!(mask("(<jane@example.com>),"), "[EMAIL]");
        assert_eq!(mask("user@localhost"), "user@localhost");
    }

    #[test]
    fn test_later_rules_see_earlier_output() {
        assert_eq!(mask("mail bob123456789@corp.com"), "mail [EMAIL]");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(mask(""), "");
        let (masked, counts) = PiiMasker::new().mask_with_counts("");
        assert_eq!(masked, "");
        assert!(counts.is_empty());
    }

    #[test]
    fn test_masking_is_idempotent() {
        let inputs = [
            "",
            "plain text",
            "Call 5551234567",
            "4111111111111111",
            "12345678901234567890",
            "x1234567890123456",
            "_1234567890123456789012345",
            "++1234567 and +441234567890",
            "123456789@x.com 1234567890123@y.org",
            "a@b.c@d.e 0000000 [CARD] [PHONE] [EMAIL]",
            "тел. 89161234567, почта иван@пример.рф",
        ];

        let masker = PiiMasker::new();
        for input in inputs {
            let once = masker.mask(input);
            assert_eq!(masker.mask(&once), once, "input: {input:?}");
        }
    }

    #[test]
    fn test_counts_in_rule_order() {
        let masker = PiiMasker::new();
        let text = "Cards 4111111111111111 and 4222222222222, call 5551234567, mail a@b.co";

        let (masked, counts) = masker.mask_with_counts(text);

        assert_eq!(masked, "Cards [CARD] and [CARD], call [PHONE], mail [EMAIL]");
        assert_eq!(
            counts,
            vec![
                count(CARD_TOKEN, 2),
                count(PHONE_TOKEN, 1),
                count(EMAIL_TOKEN, 1),
            ]
        );
    }

    #[test]
    fn test_no_pii() {
        let (masked, counts) = PiiMasker::new().mask_with_counts("Just a normal paragraph.");
        assert_eq!(masked, "Just a normal paragraph.");
        assert!(counts.is_empty());
    }

    #[test]
    fn test_extra_rules_run_after_builtin() {
        let ssn = RedactionRule::new(r"\b\d{3}-\d{2}-\d{4}\b", "[SSN]").unwrap();
        let masker = PiiMasker::new().with_rules([ssn]);

        assert_eq!(masker.rules().len(), 4);
        assert_eq!(masker.rules()[3].token(), "[SSN]");
        assert_eq!(masker.mask("SSN 123-45-6789"), "SSN [SSN]");
    }

    #[test]
    fn test_invalid_rule_rejected() {
        let err = RedactionRule::new("(unclosed", "[X]").unwrap_err();
        assert!(matches!(err, Error::InvalidRule { .. }));
    }

    #[test]
    fn test_merge_counts() {
        let mut total = vec![count(CARD_TOKEN, 1)];
        merge_counts(&mut total, vec![count(EMAIL_TOKEN, 2), count(CARD_TOKEN, 3)]);

        assert_eq!(total, vec![count(CARD_TOKEN, 4), count(EMAIL_TOKEN, 2)]);
    }
}
