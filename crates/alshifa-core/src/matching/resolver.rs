//! Entity resolution by ordered alias containment

/// A resolved entity mention
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution<'a> {
    /// The alias found in the text
    pub alias: &'a str,
    /// The canonical value the alias stands for
    pub canonical: &'a str,
}

/// Maps free text to a known entity
///
/// `None` means the text names no known entity. Callers turn that into a
/// clarification or help response, never an error.
pub trait EntityResolver: Send + Sync {
    fn resolve(&self, text: &str) -> Option<Resolution<'_>>;
}

/// Ordered (alias, canonical) pairs matched by case-insensitive containment
///
/// Declaration order breaks ties, so specific aliases ("root canal") must
/// be declared before general ones ("canal").
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    entries: Vec<VocabularyEntry>,
}

#[derive(Debug, Clone)]
struct VocabularyEntry {
    alias: String,
    alias_lower: String,
    canonical: String,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from (alias, canonical) pairs in priority order
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        pairs
            .iter()
            .fold(Self::new(), |vocab, (alias, canonical)| vocab.alias(*alias, *canonical))
    }

    /// Append an alias at the lowest priority
    pub fn alias(mut self, alias: impl Into<String>, canonical: impl Into<String>) -> Self {
        let alias = alias.into();
        self.entries.push(VocabularyEntry {
            alias_lower: alias.to_lowercase(),
            alias,
            canonical: canonical.into(),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl EntityResolver for Vocabulary {
    fn resolve(&self, text: &str) -> Option<Resolution<'_>> {
        let text = text.to_lowercase();
        self.entries
            .iter()
            .find(|entry| text.contains(&entry.alias_lower))
            .map(|entry| Resolution {
                alias: &entry.alias,
                canonical: &entry.canonical,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_case_insensitively() {
        let vocab = Vocabulary::from_pairs(&[("lidocaine", "Lidocaine"), ("gloves", "Gloves")]);
        let hit = vocab.resolve("Check status of LIDOCAINE").unwrap();
        assert_eq!(hit.canonical, "Lidocaine");
        assert_eq!(hit.alias, "lidocaine");
    }

    #[test]
    fn test_first_declared_alias_wins() {
        let vocab = Vocabulary::from_pairs(&[("root canal", "root canal"), ("canal", "canal")]);
        assert_eq!(vocab.resolve("my root canal").unwrap().canonical, "root canal");

        let reversed = Vocabulary::from_pairs(&[("canal", "canal"), ("root canal", "root canal")]);
        assert_eq!(reversed.resolve("my root canal").unwrap().canonical, "canal");
    }

    #[test]
    fn test_declaration_order_beats_text_position() {
        let vocab = Vocabulary::from_pairs(&[("gloves", "Gloves"), ("lidocaine", "Lidocaine")]);
        let hit = vocab.resolve("lidocaine and gloves").unwrap();
        assert_eq!(hit.canonical, "Gloves");
    }

    #[test]
    fn test_no_match() {
        let vocab = Vocabulary::from_pairs(&[("ali", "Ali")]);
        assert!(vocab.resolve("status of the crown").is_none());
        assert!(Vocabulary::new().resolve("anything").is_none());
    }
}
