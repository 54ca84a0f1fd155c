//! # File Management Module
//!
//! Questo modulo gestisce la discovery delle immagini e le utilità di
//! formattazione usate nei report.
//!
//! ## Responsabilità:
//! - Discovery ricorsiva di immagini in directory
//! - Riconoscimento dei formati supportati tramite estensione
//! - Formattazione human-readable delle dimensioni (unità SI, 3 cifre)
//! - Formattazione delle percentuali e pluralizzazione
//!
//! ## Formati supportati:
//! - PNG, JPG, JPEG, GIF, SVG
//!
//! ## Esempio:
//! ```rust
//! use imagemin::file_manager::FileManager;
//!
//! assert_eq!(FileManager::format_size(1337), "1.34 kB");
//! assert_eq!(FileManager::format_percent(50.0), "50");
//! assert_eq!(FileManager::plural("image", 2), "images");
//! ```

use anyhow::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "svg"];

/// Manages image discovery and report formatting
pub struct FileManager;

impl FileManager {
    /// Find all supported images in a directory, sorted for stable output
    pub fn find_image_files(root: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();
            if Self::is_supported_format(path) {
                files.push(path.to_path_buf());
            }
        }

        files.sort();
        Ok(files)
    }

    /// Check if a file format is supported
    pub fn is_supported_format(path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
    }

    /// Human-readable size in SI units with three significant digits
    pub fn format_size(size: u64) -> String {
        const UNITS: &[&str] = &["B", "kB", "MB", "GB", "TB", "PB"];

        if size < 1000 {
            return format!("{} B", size);
        }

        let mut value = size as f64;
        let mut unit_index = 0;
        while value >= 1000.0 && unit_index < UNITS.len() - 1 {
            value /= 1000.0;
            unit_index += 1;
        }

        let integer_digits = if value >= 100.0 {
            3
        } else if value >= 10.0 {
            2
        } else {
            1
        };
        let decimals = 3usize.saturating_sub(integer_digits);
        let rounded: f64 = format!("{:.*}", decimals, value).parse().unwrap_or(value);

        format!("{} {}", rounded, UNITS[unit_index])
    }

    /// Percentage with one decimal, dropping a trailing `.0`
    pub fn format_percent(percent: f64) -> String {
        let formatted = format!("{:.1}", percent);
        match formatted.strip_suffix(".0") {
            Some(whole) => whole.to_string(),
            None => formatted,
        }
    }

    /// Pluralize a word for a count
    pub fn plural(word: &str, count: usize) -> String {
        if count == 1 {
            word.to_string()
        } else {
            format!("{}s", word)
        }
    }

    /// Calculate percentage reduction, 0 for empty originals
    pub fn calculate_reduction(original_size: u64, new_size: u64) -> f64 {
        if original_size == 0 {
            0.0
        } else {
            ((original_size as f64 - new_size as f64) / original_size as f64) * 100.0
        }
    }
}
