//! # Task Optimizer Module
//!
//! Worker per la minificazione di un singolo file.
//!
//! Pipeline: lettura → compressione (una sola chiamata con l'intera catena
//! di plugin) → scrittura incondizionata sulla destinazione. Qualsiasi
//! errore viene convertito in un `FileResult` fallito e non risale mai al
//! batch driver. Un errore in scrittura conserva l'esito della compressione:
//! i byte risparmiati contano comunque nei totali.

use crate::{
    error::MinifyError,
    file_manager::FileManager,
    plugin::{Compressor, PluginChain},
    store::FileStore,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

/// Source and destination of one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePair {
    pub src: PathBuf,
    pub dest: PathBuf,
}

impl FilePair {
    pub fn new(src: impl Into<PathBuf>, dest: impl Into<PathBuf>) -> Self {
        Self {
            src: src.into(),
            dest: dest.into(),
        }
    }

    /// Minify a file onto itself
    pub fn in_place(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            dest: path.clone(),
            src: path,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Optimized,
    AlreadyOptimal,
    Failed,
}

/// Outcome of one file, immutable once built
#[derive(Debug, Clone, PartialEq)]
pub struct FileResult {
    pub src: PathBuf,
    pub dest: PathBuf,
    pub original_size: u64,
    pub optimized_size: u64,
    /// Negative when the pipeline grew the file
    pub saved_bytes: i64,
    pub status: FileStatus,
    pub error: Option<String>,
}

impl FileResult {
    /// Result of a file that went through the whole pipeline
    pub fn completed(pair: &FilePair, original_size: u64, optimized_size: u64) -> Self {
        let saved_bytes = original_size as i64 - optimized_size as i64;
        let status = if saved_bytes > 0 {
            FileStatus::Optimized
        } else {
            FileStatus::AlreadyOptimal
        };

        Self {
            src: pair.src.clone(),
            dest: pair.dest.clone(),
            original_size,
            optimized_size,
            saved_bytes,
            status,
            error: None,
        }
    }

    /// `original_size` is 0 when the read itself failed
    pub fn failed(pair: &FilePair, original_size: u64, error: impl Into<String>) -> Self {
        Self {
            src: pair.src.clone(),
            dest: pair.dest.clone(),
            original_size,
            optimized_size: 0,
            saved_bytes: 0,
            status: FileStatus::Failed,
            error: Some(error.into()),
        }
    }

    /// Attach a failure that happened after compression; sizes and status
    /// still describe the compressed output
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Any stage of the pipeline failed
    pub fn is_failed(&self) -> bool {
        self.status == FileStatus::Failed || self.error.is_some()
    }

    pub fn percent_saved(&self) -> f64 {
        match self.status {
            FileStatus::Failed => 0.0,
            _ => FileManager::calculate_reduction(self.original_size, self.optimized_size),
        }
    }

    /// Parenthesized part of the per-file log line
    pub fn describe(&self) -> String {
        match self.status {
            FileStatus::Optimized => format!(
                "saved {} - {}%",
                FileManager::format_size(self.saved_bytes.max(0) as u64),
                FileManager::format_percent(self.percent_saved())
            ),
            FileStatus::AlreadyOptimal => "already optimized".to_string(),
            FileStatus::Failed => format!("failed: {}", self.error.as_deref().unwrap_or("unknown error")),
        }
    }
}

/// Per-file worker, cheap to clone into spawned tasks
#[derive(Clone)]
pub struct TaskOptimizer {
    store: Arc<dyn FileStore>,
    compressor: Arc<dyn Compressor>,
    plugins: Arc<PluginChain>,
}

impl TaskOptimizer {
    pub fn new(
        store: Arc<dyn FileStore>,
        compressor: Arc<dyn Compressor>,
        plugins: Arc<PluginChain>,
    ) -> Self {
        Self {
            store,
            compressor,
            plugins,
        }
    }

    /// Run the pipeline for one file. Never fails: errors become a failed
    /// result and a warning tagged with the source path. A write failure
    /// keeps the compression outcome, so savings still count.
    pub async fn process_file(&self, pair: &FilePair) -> FileResult {
        let original = match self.store.read(&pair.src).await {
            Ok(bytes) => bytes,
            Err(source) => {
                return Self::fail(pair, 0, MinifyError::Read {
                    path: pair.src.clone(),
                    source,
                })
            }
        };
        let original_size = original.len() as u64;

        let optimized = match self.compressor.compress(original, &self.plugins).await {
            Ok(bytes) => bytes,
            Err(e) => return Self::fail(pair, original_size, e.into()),
        };

        let result = FileResult::completed(pair, original_size, optimized.len() as u64);

        // written even when not smaller
        if let Err(source) = self.store.write(&pair.dest, &optimized).await {
            let err = MinifyError::Write {
                path: pair.dest.clone(),
                source,
            };
            warn!("{} in file {}", err, pair.src.display());
            return result.with_error(err.to_string());
        }

        debug!("✔ {} ({})", pair.src.display(), result.describe());
        result
    }

    fn fail(pair: &FilePair, original_size: u64, err: MinifyError) -> FileResult {
        warn!("{} in file {}", err, pair.src.display());
        FileResult::failed(pair, original_size, err.to_string())
    }
}
