//! Ordered keyword rules for free-text issue triage.
//!
//! Rules are tested top to bottom against the lower-cased input and the
//! first rule with any matching keyword wins. Keyword sets overlap, so the
//! declared order is part of the behaviour.

use serde::{Deserialize, Serialize};

/// One `(keywords, response)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRule {
    pub name: String,
    pub keywords: Vec<String>,
    pub response: String,
}

impl KeywordRule {
    pub fn new(name: &str, keywords: &[&str], response: &str) -> Self {
        Self {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            response: response.to_string(),
        }
    }

    fn matches(&self, lowered: &str) -> bool {
        self.keywords
            .iter()
            .any(|k| !k.is_empty() && lowered.contains(&k.to_lowercase()))
    }
}

/// Outcome of classifying one input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification<'a> {
    /// Name of the matching rule, `None` for the fallback.
    pub rule: Option<&'a str>,
    pub response: &'a str,
}

/// First-match-wins rule list with a fallback answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordClassifier {
    rules: Vec<KeywordRule>,
    fallback: String,
}

pub const DEFAULT_FALLBACK: &str = "I'll search our knowledge base for that issue. \
If I can't find a solution, I can create a support ticket. \
Could you provide more details about what's happening?";

impl KeywordClassifier {
    pub fn new(rules: Vec<KeywordRule>, fallback: &str) -> Self {
        Self {
            rules,
            fallback: fallback.to_string(),
        }
    }

    /// The support agent's built-in triage rules.
    pub fn support_defaults() -> Self {
        Self::new(
            vec![
                KeywordRule::new(
                    "startup",
                    &["start", "launch", "open", "won't run"],
                    "For startup issues, try: \
1) Restart your computer, \
2) Run as administrator (Windows), \
3) Check for conflicting software, \
4) Reinstall if needed. \
Did any of these help?",
                ),
                KeywordRule::new(
                    "license",
                    &["license", "activate", "key"],
                    "For license issues: \
Check your license at account.example.com. \
Make sure it hasn't expired and isn't used on too many devices. \
Would you like me to check your license status?",
                ),
                KeywordRule::new(
                    "performance",
                    &["slow", "performance", "lag"],
                    "For performance issues: \
1) Close other applications, \
2) Verify system requirements (8GB RAM minimum), \
3) Clear cache (Settings > Advanced > Clear Cache), \
4) Update to latest version. \
Which of these would you like help with?",
                ),
                KeywordRule::new(
                    "password",
                    &["password", "login", "forgot"],
                    "For password reset: \
Click 'Forgot Password' on the login screen, \
enter your email, and check your inbox for a reset link. \
The link arrives within 5 minutes. \
Still having trouble?",
                ),
            ],
            DEFAULT_FALLBACK,
        )
    }

    pub fn classify(&self, text: &str) -> Classification<'_> {
        let lowered = text.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&lowered))
            .map(|rule| Classification {
                rule: Some(rule.name.as_str()),
                response: rule.response.as_str(),
            })
            .unwrap_or(Classification {
                rule: None,
                response: self.fallback.as_str(),
            })
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::support_defaults()
    }
}
