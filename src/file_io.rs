use crate::csv::encode_deck;
use crate::error::{Result, StudyError};
use crate::models::Flashcard;
use regex::Regex;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

pub const EXPORT_MIME: &str = "text/csv;charset=utf-8";
const EXPORT_SUFFIX: &str = "_flashcards.csv";

/// File name for a deck export. The result never contains a path separator
/// and never starts with a dot, so it always names a file directly in the
/// export directory.
pub fn export_filename(title: &str) -> String {
    lazy_static::lazy_static! {
        static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
        static ref RESERVED: Regex = Regex::new(r#"[/\\:*?"<>|\x00-\x1f\x7f]"#).unwrap();
    }
    let spaced = WHITESPACE.replace_all(title, "_");
    let cleaned = RESERVED.replace_all(&spaced, "_");
    let stem = cleaned.trim_start_matches('.');
    format!("{}{}", stem, EXPORT_SUFFIX)
}

/// Encode `cards` and write them under `dir`, returning the written path.
pub fn save_export(dir: &Path, title: &str, cards: &[Flashcard]) -> Result<PathBuf> {
    let name = export_filename(title);
    if Path::new(&name).file_name() != Some(OsStr::new(&name)) {
        return Err(StudyError::Validation(format!(
            "Invalid export file name '{}'",
            name
        )));
    }
    fs::create_dir_all(dir)?;
    let path = dir.join(name);
    fs::write(&path, encode_deck(cards))?;
    log::info!("exported {} flashcards to {}", cards.len(), path.display());
    Ok(path)
}
