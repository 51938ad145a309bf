use std::path::Path;
use unicode_width::UnicodeWidthStr;

use crate::entry::WordEntry;
use crate::i18n::I18n;
use crate::view::{Notice, Status};

// Widest term column used by the plain-text table
const MAX_TERM_WIDTH: usize = 32;

pub fn status_text(status: Status, i18n: &I18n) -> String {
    match status {
        Status::Total(total) => i18n.t_format("status_total", &[&total.to_string()]),
        Status::Matches { total, shown } if total > shown => {
            i18n.t_format("status_matches_limited", &[&total.to_string(), &shown.to_string()])
        }
        Status::Matches { total, .. } => i18n.t_format("status_matches", &[&total.to_string()]),
    }
}

pub fn notice_text(notice: &Notice, i18n: &I18n) -> String {
    match notice {
        Notice::DatasetEmpty => i18n.t("dataset_empty"),
        Notice::NoResults => i18n.t("no_results"),
        Notice::QueryFailed(reason) => i18n.t_format("query_failed", &[reason]),
    }
}

pub fn no_data_source_text(path: &Path, i18n: &I18n) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    i18n.t_format("no_data_source", &[&name])
}

/// Right-pad by display width, so Cyrillic and wide glyphs line up.
pub fn pad_to_width(text: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(text);
    if w >= width {
        text.to_string()
    } else {
        format!("{}{}", text, " ".repeat(width - w))
    }
}

/// Two aligned columns, display-capitalized.
pub fn table_lines(rows: &[WordEntry]) -> Vec<String> {
    let width = rows
        .iter()
        .map(|r| UnicodeWidthStr::width(r.display_term().as_str()))
        .max()
        .unwrap_or(0)
        .min(MAX_TERM_WIDTH);

    rows.iter()
        .map(|r| format!("{}  {}", pad_to_width(&r.display_term(), width), r.display_translation()))
        .collect()
}
