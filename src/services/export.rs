use crate::model::pair::TranslationPair;

pub const PREVIEW_PHRASES_COUNT: usize = 3;
pub const EXPORT_MIME: &str = "text/plain";

/// One record per pair, in input order: `source + field + " " + target + record`.
///
/// Separators are inserted verbatim. Nothing inside the pair text is escaped,
/// so a separator that also occurs in the data makes the output ambiguous.
pub fn format_records(pairs: &[TranslationPair], field_sep: &str, record_sep: &str) -> Vec<String> {
    pairs
        .iter()
        .map(|p| format!("{}{} {}{}", p.source, field_sep, p.target, record_sep))
        .collect()
}

pub fn export_text(pairs: &[TranslationPair], field_sep: &str, record_sep: &str) -> String {
    format_records(pairs, field_sep, record_sep).concat()
}

pub fn preview(records: &[String], count: usize) -> &[String] {
    &records[..records.len().min(count)]
}

pub fn suggested_file_name(category: &str) -> String {
    format!("{category}.txt")
}
