use std::path::Path;

use crate::config::AppConfig;
use crate::error::Result;
use crate::model::pair::Dictionary;
use crate::model::separator::SeparatorKind;
use crate::services::dialog::{ExportDialog, ExportView};
use crate::services::dictionary::{self, LoadedDictionary};
use crate::services::download::{self, BlobStore, DownloadLink};

/// Everything the core keeps between requests.
#[derive(Debug)]
pub struct Session {
    dictionary: Dictionary,
    default_category: String,
    dialog: ExportDialog,
    store: BlobStore,
}

impl Session {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            dictionary: Dictionary {
                category: config.export.default_category.clone(),
                translations: Vec::new(),
            },
            default_category: config.export.default_category.clone(),
            dialog: ExportDialog::new(),
            store: BlobStore::new(&config.export.staging_dir),
        }
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn dialog(&self) -> &ExportDialog {
        &self.dialog
    }

    /// Replaces the translation data. A staged download built from the old
    /// data is revoked.
    pub fn load(&mut self, mut dictionary: Dictionary) {
        if dictionary.category.trim().is_empty() {
            dictionary.category = self.default_category.clone();
        }
        self.dictionary = dictionary;
        self.dialog.revoke_download();
    }

    pub fn load_file(&mut self, path: &Path, category: Option<&str>) -> Result<String> {
        let LoadedDictionary {
            dictionary,
            encoding,
        } = dictionary::load_file(path, category)?;
        self.load(dictionary);
        Ok(encoding)
    }

    pub fn open(&mut self) {
        self.dialog.open();
    }

    pub fn close(&mut self) {
        self.dialog.close();
    }

    pub fn select_separator(&mut self, kind: SeparatorKind, id: &str) -> Result<()> {
        self.dialog.select_separator(kind, id)
    }

    pub fn set_custom_separator(&mut self, kind: SeparatorKind, text: &str) {
        self.dialog.set_custom_separator(kind, text);
    }

    pub fn export_text(&self) -> String {
        self.dialog.export_text(&self.dictionary.translations)
    }

    pub fn download(&mut self) -> Result<DownloadLink> {
        let link = self.dialog.download(
            &self.store,
            &self.dictionary.translations,
            &self.dictionary.category,
        )?;
        Ok(link.clone())
    }

    pub fn save(&self, dir: &Path) -> Result<std::path::PathBuf> {
        download::save(&self.export_text(), dir, &self.dictionary.category)
    }

    pub fn view(&self) -> ExportView {
        self.dialog
            .view(&self.dictionary.translations, &self.dictionary.category)
    }
}
