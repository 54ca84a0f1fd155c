//! # Progress Tracking and Statistics Module
//!
//! Questo modulo gestisce il progress tracking e le statistiche del batch.
//!
//! ## Responsabilità:
//! - Progress bar visual con `indicatif` (un tick per ogni file completato)
//! - `BatchSummary`: accumulatore delle statistiche del batch
//! - Riga di riepilogo finale
//!
//! ## Statistiche tracciate:
//! - **total_files_improved**: file effettivamente ridotti
//! - **total_original_bytes**: dimensione originale dei soli file ridotti
//! - **total_saved_bytes**: byte risparmiati sui soli file ridotti
//! - **files_processed**: file terminati, con qualsiasi esito
//! - **files_already_optimal**: file non ridotti (scritti comunque)
//! - **files_failed**: file falliti in lettura, compressione o scrittura
//!
//! Un file ridotto la cui scrittura fallisce conta sia nei totali sia in
//! `files_failed`.
//!
//! La percentuale finale è calcolata sui totali (`saved / original`),
//! non come media delle percentuali dei singoli file.
//!
//! ## Esempio:
//! ```text
//! Minified 2 images (saved 70 B - 23.3%)
//! Minified 0 images
//! ```

use crate::file_manager::FileManager;
use crate::optimizer::task_optimizer::{FileResult, FileStatus};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::time::Duration;

/// Running aggregate of one batch
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total_files_improved: usize,
    pub total_original_bytes: u64,
    pub total_saved_bytes: u64,
    pub files_processed: usize,
    pub files_already_optimal: usize,
    pub files_failed: usize,
}

impl BatchSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one file result into the totals. Only improved files count
    /// toward the byte totals, even when their write failed.
    pub fn record(&mut self, result: &FileResult) {
        self.files_processed += 1;
        match result.status {
            FileStatus::Optimized => {
                self.total_files_improved += 1;
                self.total_original_bytes += result.original_size;
                self.total_saved_bytes += result.saved_bytes.max(0) as u64;
            }
            FileStatus::AlreadyOptimal if result.error.is_none() => self.files_already_optimal += 1,
            FileStatus::AlreadyOptimal | FileStatus::Failed => {}
        }
        if result.is_failed() {
            self.files_failed += 1;
        }
    }

    pub fn percent_saved(&self) -> f64 {
        if self.total_original_bytes == 0 {
            return 0.0;
        }
        self.total_saved_bytes as f64 / self.total_original_bytes as f64 * 100.0
    }

    pub fn format_summary(&self) -> String {
        let count = self.total_files_improved;
        let mut line = format!("Minified {} {}", count, FileManager::plural("image", count));

        if count > 0 {
            line.push_str(&format!(
                " (saved {} - {}%)",
                FileManager::format_size(self.total_saved_bytes),
                FileManager::format_percent(self.percent_saved())
            ));
        }

        line
    }
}

/// Manages the terminal progress bar of a batch
#[derive(Clone)]
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new(total_files: u64) -> Self {
        let bar = ProgressBar::new(total_files);

        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-");
        bar.set_style(style);
        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// A manager that draws nothing (JSON mode, quiet mode, tests)
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Advance by one file and show a message
    pub fn update(&self, message: &str) {
        self.bar.inc(1);
        self.bar.set_message(message.to_string());
    }

    /// Finish and erase the bar, leaving the final line to the logger
    pub fn clear(&self) {
        self.bar.finish_and_clear();
    }

}
