//! # JSON Output Module
//!
//! Questo modulo gestisce l'output strutturato in JSON per chiamanti programmatici
//! (build tool, script, pipeline CI).
//!
//! ## Responsabilità:
//! - Emette un messaggio JSON per riga su stdout (NDJSON)
//! - Riusa `FileResult` e `BatchSummary` per i payload
//!
//! ## Tipi di messaggi:
//! - `start`: Inizio del batch (file, concorrenza, catena di plugin)
//! - `file_complete`: Fine elaborazione di un file (anche se fallito)
//! - `complete`: Fine batch con statistiche finali
//! - `error`: Errore fatale prima o durante l'avvio del batch

use crate::optimizer::task_optimizer::{FileResult, FileStatus};
use crate::progress::BatchSummary;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Tipo di messaggio JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum JsonMessage {
    /// Inizio del batch
    #[serde(rename = "start")]
    Start {
        total_files: usize,
        concurrency: usize,
        plugins: Vec<String>,
    },

    /// Fine elaborazione di un file
    #[serde(rename = "file_complete")]
    FileComplete {
        src: PathBuf,
        dest: PathBuf,
        status: FileStatus,
        original_size: u64,
        optimized_size: u64,
        saved_bytes: i64,
        percent_saved: f64,
        error: Option<String>,
    },

    /// Batch completato
    #[serde(rename = "complete")]
    Complete {
        total_files_improved: usize,
        total_original_bytes: u64,
        total_saved_bytes: u64,
        files_processed: usize,
        files_already_optimal: usize,
        files_failed: usize,
        percent_saved: f64,
        summary: String,
        duration_seconds: f64,
    },

    /// Errore generale
    #[serde(rename = "error")]
    Error {
        message: String,
        details: Option<String>,
    },
}

impl JsonMessage {
    /// Emette il messaggio JSON su stdout
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            println!("{}", json);
        }
    }

    pub fn start(total_files: usize, concurrency: usize, plugins: Vec<String>) -> Self {
        Self::Start {
            total_files,
            concurrency,
            plugins,
        }
    }

    pub fn file_complete(result: &FileResult) -> Self {
        Self::FileComplete {
            src: result.src.clone(),
            dest: result.dest.clone(),
            status: result.status,
            original_size: result.original_size,
            optimized_size: result.optimized_size,
            saved_bytes: result.saved_bytes,
            percent_saved: result.percent_saved(),
            error: result.error.clone(),
        }
    }

    pub fn complete(summary: &BatchSummary, duration_seconds: f64) -> Self {
        Self::Complete {
            total_files_improved: summary.total_files_improved,
            total_original_bytes: summary.total_original_bytes,
            total_saved_bytes: summary.total_saved_bytes,
            files_processed: summary.files_processed,
            files_already_optimal: summary.files_already_optimal,
            files_failed: summary.files_failed,
            percent_saved: summary.percent_saved(),
            summary: summary.format_summary(),
            duration_seconds,
        }
    }

    pub fn error(message: impl Into<String>, details: Option<String>) -> Self {
        Self::Error {
            message: message.into(),
            details,
        }
    }
}
