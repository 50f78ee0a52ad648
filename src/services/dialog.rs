use serde::Serialize;

use crate::error::Result;
use crate::model::pair::TranslationPair;
use crate::model::separator::{
    SeparatorKind, SeparatorSetting, CUSTOM_SEPARATOR_ID, CUSTOM_SEPARATOR_MAX_CHARS,
};
use crate::services::download::{BlobStore, DownloadLink, StagedBlob};
use crate::services::export::{self, PREVIEW_PHRASES_COUNT};

const DIALOG_TITLE: &str = "Download phrases";
const PREVIEW_HEADING: &str = "Preview:";
const CUSTOM_LABEL: &str = "Custom";
const LICENSE_NOTICE: &str = "Obsah můžete pro své učely používat zdarma a bez omezení, \
šířit ho dál můžete jen za pomínek licence CC BY-NC 4.0";
const LICENSE_URL: &str = "https://creativecommons.org/licenses/by-nc/4.0/deed.cs";

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DialogState {
    #[default]
    Closed,
    Open,
}

/// Export dialog state for one session. Separator choices persist across
/// close/reopen; the staged download does not.
#[derive(Debug)]
pub struct ExportDialog {
    state: DialogState,
    field: SeparatorSetting,
    record: SeparatorSetting,
    staged: Option<StagedBlob>,
}

impl Default for ExportDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl ExportDialog {
    pub fn new() -> Self {
        Self {
            state: DialogState::Closed,
            field: SeparatorSetting::new(SeparatorKind::Field),
            record: SeparatorSetting::new(SeparatorKind::Record),
            staged: None,
        }
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == DialogState::Open
    }

    pub fn open(&mut self) {
        self.state = DialogState::Open;
    }

    pub fn close(&mut self) {
        self.state = DialogState::Closed;
        self.revoke_download();
    }

    fn setting_mut(&mut self, kind: SeparatorKind) -> &mut SeparatorSetting {
        match kind {
            SeparatorKind::Field => &mut self.field,
            SeparatorKind::Record => &mut self.record,
        }
    }

    /// Changing a separator revokes the staged download, whose payload was
    /// built with the previous options.
    pub fn select_separator(&mut self, kind: SeparatorKind, id: &str) -> Result<()> {
        self.setting_mut(kind).select(id)?;
        self.revoke_download();
        Ok(())
    }

    pub fn set_custom_separator(&mut self, kind: SeparatorKind, text: &str) {
        self.setting_mut(kind).set_custom(text);
        self.revoke_download();
    }

    pub fn select_field_separator(&mut self, id: &str) -> Result<()> {
        self.select_separator(SeparatorKind::Field, id)
    }

    pub fn set_custom_field_separator(&mut self, text: &str) {
        self.set_custom_separator(SeparatorKind::Field, text);
    }

    pub fn select_record_separator(&mut self, id: &str) -> Result<()> {
        self.select_separator(SeparatorKind::Record, id)
    }

    pub fn set_custom_record_separator(&mut self, text: &str) {
        self.set_custom_separator(SeparatorKind::Record, text);
    }

    pub fn records(&self, pairs: &[TranslationPair]) -> Vec<String> {
        export::format_records(pairs, self.field.effective(), self.record.effective())
    }

    pub fn export_text(&self, pairs: &[TranslationPair]) -> String {
        self.records(pairs).concat()
    }

    pub fn download_link(&self) -> Option<&DownloadLink> {
        self.staged.as_ref().map(StagedBlob::link)
    }

    /// Stages the current export, revoking any previous link first.
    pub fn download(
        &mut self,
        store: &BlobStore,
        pairs: &[TranslationPair],
        category: &str,
    ) -> Result<&DownloadLink> {
        self.revoke_download();
        let payload = self.export_text(pairs);
        let staged = self.staged.insert(store.stage(&payload, category)?);
        Ok(staged.link())
    }

    pub fn revoke_download(&mut self) {
        self.staged.take();
    }

    pub fn view(&self, pairs: &[TranslationPair], category: &str) -> ExportView {
        let records = self.records(pairs);

        ExportView {
            state: self.state,
            is_open: self.is_open(),
            title: DIALOG_TITLE,
            field: SeparatorGroupView::new(&self.field),
            record: SeparatorGroupView::new(&self.record),
            preview_heading: PREVIEW_HEADING,
            preview: export::preview(&records, PREVIEW_PHRASES_COUNT).to_vec(),
            file_name: export::suggested_file_name(category),
            download: self.download_link().cloned(),
            license: LicenseView {
                notice: LICENSE_NOTICE,
                url: LICENSE_URL,
            },
        }
    }
}

/// Render model handed to the host after every change.
#[derive(Debug, Serialize, Clone)]
pub struct ExportView {
    pub state: DialogState,
    pub is_open: bool,
    pub title: &'static str,
    pub field: SeparatorGroupView,
    pub record: SeparatorGroupView,
    pub preview_heading: &'static str,
    pub preview: Vec<String>,
    pub file_name: String,
    pub download: Option<DownloadLink>,
    pub license: LicenseView,
}

#[derive(Debug, Serialize, Clone)]
pub struct LicenseView {
    pub notice: &'static str,
    pub url: &'static str,
}

#[derive(Debug, Serialize, Clone)]
pub struct SeparatorGroupView {
    pub heading: &'static str,
    pub options: Vec<SeparatorOptionView>,
    pub custom: CustomInputView,
}

#[derive(Debug, Serialize, Clone)]
pub struct SeparatorOptionView {
    pub id: &'static str,
    pub label: String,
    pub checked: bool,
}

#[derive(Debug, Serialize, Clone)]
pub struct CustomInputView {
    pub id: &'static str,
    pub label: &'static str,
    pub checked: bool,
    pub visible: bool,
    pub value: String,
    pub max_length: usize,
}

impl SeparatorGroupView {
    fn new(setting: &SeparatorSetting) -> Self {
        let selected = setting.selection().id();
        let options = setting
            .kind()
            .options()
            .iter()
            .map(|o| SeparatorOptionView {
                id: o.id,
                label: format!("{} {}", o.label, o.display_value()),
                checked: !setting.is_custom() && o.id == selected,
            })
            .collect();

        Self {
            heading: setting.kind().heading(),
            options,
            custom: CustomInputView {
                id: CUSTOM_SEPARATOR_ID,
                label: CUSTOM_LABEL,
                checked: setting.is_custom(),
                visible: setting.is_custom(),
                value: setting.custom().to_string(),
                max_length: CUSTOM_SEPARATOR_MAX_CHARS,
            },
        }
    }
}
