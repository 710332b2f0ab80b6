//! Intent classification by ordered keyword rules

/// Maps free text to one intent of a fixed per-domain set
///
/// `None` is the fallback intent; every agent answers it with help text.
pub trait IntentClassifier<I>: Send + Sync {
    fn classify(&self, text: &str) -> Option<I>;
}

/// A keyword set paired with the intent it signals
#[derive(Debug, Clone)]
pub struct KeywordRule<I> {
    keywords: Vec<String>,
    intent: I,
}

impl<I> KeywordRule<I> {
    /// Whether any keyword occurs in the already-lowercased text
    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|kw| lowered.contains(kw.as_str()))
    }
}

/// Ordered keyword rules; the first rule with a keyword in the text wins
///
/// Order is load-bearing: scheduling checks history words before booking
/// words, so "when is my next appointment history" is a history question.
#[derive(Debug, Clone)]
pub struct KeywordRules<I> {
    rules: Vec<KeywordRule<I>>,
}

impl<I> KeywordRules<I> {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule at the lowest priority
    pub fn rule(mut self, keywords: &[&str], intent: I) -> Self {
        self.rules.push(KeywordRule {
            keywords: keywords.iter().map(|kw| kw.to_lowercase()).collect(),
            intent,
        });
        self
    }
}

impl<I> Default for KeywordRules<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Copy + Send + Sync> IntentClassifier<I> for KeywordRules<I> {
    fn classify(&self, text: &str) -> Option<I> {
        let lowered = text.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&lowered))
            .map(|rule| rule.intent)
    }
}

/// Whether any keyword occurs in the text, ignoring case
pub fn contains_any(text: &str, keywords: &[&str]) -> bool {
    let lowered = text.to_lowercase();
    keywords
        .iter()
        .any(|kw| lowered.contains(&kw.to_lowercase()))
}
