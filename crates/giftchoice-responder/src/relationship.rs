/// A gift recipient the assistant recognises, with the words that signal it
#[derive(Debug, PartialEq, Eq)]
pub struct Relationship {
    pub label: &'static str,
    pub synonyms: &'static [&'static str],
    /// Extra product terms that count as a match for this recipient
    pub product_terms: &'static [&'static str],
}

/// Recipient table. Detection takes the first entry with a matching synonym,
/// so the order here is the tie-break order.
pub const RELATIONSHIPS: &[Relationship] = &[
    Relationship {
        label: "boyfriend",
        synonyms: &["boyfriend", "bf", "him", "male", "man"],
        product_terms: &["men", "male"],
    },
    Relationship {
        label: "girlfriend",
        synonyms: &["girlfriend", "gf", "her", "female", "woman"],
        product_terms: &["women", "female"],
    },
    Relationship {
        label: "husband",
        synonyms: &["husband", "hubby"],
        product_terms: &[],
    },
    Relationship {
        label: "wife",
        synonyms: &["wife"],
        product_terms: &[],
    },
    Relationship {
        label: "friend",
        synonyms: &["friend", "buddy", "pal"],
        product_terms: &[],
    },
    Relationship {
        label: "mother",
        synonyms: &["mother", "mom", "mum", "mommy"],
        product_terms: &[],
    },
    Relationship {
        label: "father",
        synonyms: &["father", "dad", "daddy", "papa"],
        product_terms: &[],
    },
    Relationship {
        label: "sister",
        synonyms: &["sister", "sis"],
        product_terms: &[],
    },
    Relationship {
        label: "brother",
        synonyms: &["brother", "bro"],
        product_terms: &[],
    },
];

impl Relationship {
    /// "for him", "for her" or "for your <label>"
    pub fn recipient_phrase(&self) -> String {
        match self.label {
            "boyfriend" => "for him".to_string(),
            "girlfriend" => "for her".to_string(),
            label => format!("for your {}", label),
        }
    }

    /// Whether a product's lowercased search text suits this recipient.
    pub fn matches_product_text(&self, search_text: &str) -> bool {
        self.synonyms.iter().any(|s| search_text.contains(s))
            || search_text.contains(self.label)
            || self.product_terms.iter().any(|t| search_text.contains(t))
    }
}

/// Substring scan over the table; `text` must already be lowercased.
pub fn detect_relationship(text: &str) -> Option<&'static Relationship> {
    RELATIONSHIPS
        .iter()
        .find(|rel| rel.synonyms.iter().any(|s| text.contains(s)))
}
