use serde::{Deserialize, Serialize};

/// One dictionary entry: a phrase and its translation.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TranslationPair {
    #[serde(default, alias = "cz_translation")]
    pub source: String,

    #[serde(default, alias = "ua_translation")]
    pub target: String,
}

impl TranslationPair {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Ordered pairs plus the category label used for the suggested file name.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Dictionary {
    #[serde(default)]
    pub category: String,

    #[serde(default, alias = "entries")]
    pub translations: Vec<TranslationPair>,
}
