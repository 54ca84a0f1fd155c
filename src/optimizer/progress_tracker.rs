//! # Progress Tracking Module
//!
//! Tracker thread-safe condiviso fra i task del batch. Possiede il
//! `BatchSummary` dietro un `Mutex` e lo aggiorna con un unico metodo,
//! `record_result`, così l'invariante dei totali vale per qualsiasi
//! interleaving. Gestisce sia output JSON che progress bar tradizionale.

use crate::{
    json_output::JsonMessage,
    optimizer::task_optimizer::FileResult,
    progress::{BatchSummary, ProgressManager},
};
use std::sync::Arc;
use tokio::sync::Mutex;

/// How a batch reports per-file progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Logs only
    #[default]
    Quiet,
    /// `indicatif` bar on stderr
    ProgressBar,
    /// NDJSON events on stdout
    Json,
}

/// Shared accumulator for one batch
#[derive(Clone)]
pub struct ProgressTracker {
    summary: Arc<Mutex<BatchSummary>>,
    progress_manager: ProgressManager,
    mode: OutputMode,
}

impl ProgressTracker {
    pub fn new(total_files: usize, mode: OutputMode) -> Self {
        let progress_manager = match mode {
            OutputMode::ProgressBar => ProgressManager::new(total_files as u64),
            OutputMode::Quiet | OutputMode::Json => ProgressManager::hidden(),
        };

        Self {
            summary: Arc::new(Mutex::new(BatchSummary::new())),
            progress_manager,
            mode,
        }
    }

    /// Fold a settled file into the summary and report it
    pub async fn record_result(&self, result: &FileResult) {
        self.summary.lock().await.record(result);

        if self.mode == OutputMode::Json {
            JsonMessage::file_complete(result).emit();
        }

        let name = result
            .src
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| result.src.display().to_string());
        let message = if result.is_failed() {
            format!("[ERROR] {}", name)
        } else {
            format!("[OK] {}: {}", name, result.describe())
        };
        self.progress_manager.update(&message);
    }

    /// Copy of the summary as it stands
    pub async fn snapshot(&self) -> BatchSummary {
        self.summary.lock().await.clone()
    }

    /// Rimuove la progress bar dal terminale
    pub fn finish(&self) {
        self.progress_manager.clear();
    }
}
