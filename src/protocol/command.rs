#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Ping,
    DetectEncoding,
    LoadTranslations,
    LoadTranslationsFile,
    ExportOpen,
    ExportClose,
    ExportSelectSeparator,
    ExportSetCustomSeparator,
    ExportView,
    ExportText,
    ExportDownload,
    ExportSave,
    Unknown,
}

impl From<&str> for Command {
    fn from(s: &str) -> Self {
        match s {
            "ping" => Command::Ping,
            "encoding.detect" | "detect_encoding" => Command::DetectEncoding,
            "translations.load" => Command::LoadTranslations,
            "translations.load_file" => Command::LoadTranslationsFile,
            "export.open" => Command::ExportOpen,
            "export.close" => Command::ExportClose,
            "export.select_separator" => Command::ExportSelectSeparator,
            "export.set_custom_separator" => Command::ExportSetCustomSeparator,
            "export.view" => Command::ExportView,
            "export.text" => Command::ExportText,
            "export.download" => Command::ExportDownload,
            "export.save" => Command::ExportSave,
            _ => Command::Unknown,
        }
    }
}
