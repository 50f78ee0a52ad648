use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::Deserialize;

use crate::error::{CoreError, Result};
use crate::model::pair::{Dictionary, TranslationPair};
use crate::services::encoding;

#[derive(Debug)]
pub struct LoadedDictionary {
    pub dictionary: Dictionary,
    pub encoding: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DictionaryFile {
    List(Vec<TranslationPair>),
    Document(Dictionary),
}

/// Reads a dictionary file. Category precedence: `category`, then the file's
/// own `category`, then the file stem.
pub fn load_file(path: &Path, category: Option<&str>) -> Result<LoadedDictionary> {
    let bytes = fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => CoreError::DictionaryNotFound(path.to_path_buf()),
        _ => CoreError::Io(e),
    })?;
    let (text, encoding) = encoding::decode(&bytes);

    let mut dictionary = match serde_json::from_str::<DictionaryFile>(&text)? {
        DictionaryFile::List(translations) => Dictionary {
            category: String::new(),
            translations,
        },
        DictionaryFile::Document(d) => {
            if d.translations.is_empty() && !has_translations_key(&text) {
                tracing::warn!(
                    path = %path.display(),
                    "dictionary document has no \"translations\" list"
                );
            }
            d
        }
    };

    if let Some(c) = category.map(str::trim).filter(|c| !c.is_empty()) {
        dictionary.category = c.to_string();
    }

    if dictionary.category.trim().is_empty() {
        dictionary.category = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
    }

    tracing::info!(
        path = %path.display(),
        category = %dictionary.category,
        count = dictionary.translations.len(),
        %encoding,
        "loaded dictionary"
    );

    Ok(LoadedDictionary {
        dictionary,
        encoding,
    })
}

fn has_translations_key(text: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(text)
        .ok()
        .and_then(|v| {
            v.as_object()
                .map(|o| o.contains_key("translations") || o.contains_key("entries"))
        })
        .unwrap_or(false)
}
