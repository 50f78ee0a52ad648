use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

pub const CUSTOM_SEPARATOR_ID: &str = "custom";
pub const CUSTOM_SEPARATOR_MAX_CHARS: usize = 50;

#[derive(Debug, PartialEq, Eq)]
pub struct SeparatorOption {
    pub id: &'static str,
    pub label: &'static str,
    pub value: &'static str,
    pub display: Option<&'static str>,
}

impl SeparatorOption {
    pub fn display_value(&self) -> String {
        match self.display {
            Some(d) => d.to_string(),
            None => format!("({})", self.value),
        }
    }
}

pub static FIELD_SEPARATORS: [SeparatorOption; 3] = [
    SeparatorOption { id: "comma", label: "comma", value: ",", display: None },
    SeparatorOption { id: "semicolon", label: "semicolon", value: ";", display: None },
    SeparatorOption { id: "tab", label: "tab", value: "    ", display: Some("(    )") },
];

pub static RECORD_SEPARATORS: [SeparatorOption; 2] = [
    SeparatorOption { id: "new_line", label: "new line", value: "\n", display: Some("") },
    SeparatorOption { id: "semicolon", label: "semicolon", value: ";", display: None },
];

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SeparatorKind {
    /// Between the phrase and its translation.
    Field,
    /// After each record.
    Record,
}

impl SeparatorKind {
    pub fn options(self) -> &'static [SeparatorOption] {
        match self {
            SeparatorKind::Field => &FIELD_SEPARATORS,
            SeparatorKind::Record => &RECORD_SEPARATORS,
        }
    }

    pub fn heading(self) -> &'static str {
        match self {
            SeparatorKind::Field => "Separator between the phrase and translation:",
            SeparatorKind::Record => "Separator between phrases:",
        }
    }
}

impl fmt::Display for SeparatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeparatorKind::Field => f.write_str("field"),
            SeparatorKind::Record => f.write_str("record"),
        }
    }
}

/// Free-text separator, never longer than [`CUSTOM_SEPARATOR_MAX_CHARS`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomSeparator(String);

impl CustomSeparator {
    pub fn new(text: &str) -> Self {
        match text.char_indices().nth(CUSTOM_SEPARATOR_MAX_CHARS) {
            Some((cut, _)) => {
                tracing::debug!(
                    max = CUSTOM_SEPARATOR_MAX_CHARS,
                    "custom separator truncated"
                );
                Self(text[..cut].to_string())
            }
            None => Self(text.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Predefined(&'static SeparatorOption),
    Custom,
}

impl Selection {
    pub fn id(&self) -> &'static str {
        match self {
            Selection::Predefined(opt) => opt.id,
            Selection::Custom => CUSTOM_SEPARATOR_ID,
        }
    }
}

/// Current choice for one separator list. The custom text survives
/// switching to a predefined option and back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeparatorSetting {
    kind: SeparatorKind,
    selection: Selection,
    custom: CustomSeparator,
}

impl SeparatorSetting {
    pub fn new(kind: SeparatorKind) -> Self {
        Self {
            kind,
            selection: Selection::Predefined(&kind.options()[0]),
            custom: CustomSeparator::default(),
        }
    }

    pub fn kind(&self) -> SeparatorKind {
        self.kind
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn custom(&self) -> &str {
        self.custom.as_str()
    }

    pub fn is_custom(&self) -> bool {
        self.selection == Selection::Custom
    }

    pub fn select(&mut self, id: &str) -> Result<()> {
        if id == CUSTOM_SEPARATOR_ID {
            self.selection = Selection::Custom;
            return Ok(());
        }

        let opt = self
            .kind
            .options()
            .iter()
            .find(|o| o.id == id)
            .ok_or_else(|| CoreError::UnknownSeparator {
                kind: self.kind,
                id: id.to_string(),
            })?;

        self.selection = Selection::Predefined(opt);
        Ok(())
    }

    pub fn set_custom(&mut self, text: &str) {
        self.custom = CustomSeparator::new(text);
    }

    /// The string actually inserted when formatting.
    pub fn effective(&self) -> &str {
        match self.selection {
            Selection::Predefined(opt) => opt.value,
            Selection::Custom => self.custom.as_str(),
        }
    }
}
