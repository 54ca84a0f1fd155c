//! # Image Minifier Orchestrator
//!
//! Batch driver: risolve la catena di plugin una sola volta, poi elabora
//! tutti i file con un tetto di concorrenza (un `Semaphore` tenuto per
//! l'intera pipeline di ogni file) e restituisce il `BatchSummary` solo
//! quando ogni file è terminato, con successo o meno.

use crate::{
    config::OptimizationOptions,
    json_output::JsonMessage,
    optimizer::{
        progress_tracker::{OutputMode, ProgressTracker},
        task_optimizer::{FilePair, FileResult, TaskOptimizer},
    },
    plugin::{chain_names, resolve_plugins, Compressor, PipelineCompressor, PluginChain, PluginRegistry},
    progress::BatchSummary,
    store::{FileStore, LocalFileStore},
};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{error, info};

/// Orchestratore principale
pub struct ImageMinifier {
    options: OptimizationOptions,
    registry: PluginRegistry,
    store: Arc<dyn FileStore>,
    compressor: Arc<dyn Compressor>,
    output: OutputMode,
}

impl ImageMinifier {
    /// Minifier over the local filesystem with the default plugin registry
    pub fn new(options: OptimizationOptions) -> Self {
        Self {
            options,
            registry: PluginRegistry::default(),
            store: Arc::new(LocalFileStore),
            compressor: Arc::new(PipelineCompressor),
            output: OutputMode::Quiet,
        }
    }

    pub fn with_registry(mut self, registry: PluginRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_store(mut self, store: Arc<dyn FileStore>) -> Self {
        self.store = store;
        self
    }

    pub fn with_compressor(mut self, compressor: Arc<dyn Compressor>) -> Self {
        self.compressor = compressor;
        self
    }

    pub fn with_output(mut self, output: OutputMode) -> Self {
        self.output = output;
        self
    }

    pub fn options(&self) -> &OptimizationOptions {
        &self.options
    }

    /// Chain shared by every file of the batch
    pub fn resolve_plugins(&self) -> PluginChain {
        resolve_plugins(
            self.options.use_plugins.as_ref(),
            &self.registry,
            &self.options.plugin_options(),
        )
    }

    /// Process every pair and return the final summary. Per-file failures
    /// are recorded, never returned.
    pub async fn run(&self, files: Vec<FilePair>) -> BatchSummary {
        let start_time = Instant::now();

        let plugins = self.resolve_plugins();
        let concurrency = self.options.effective_concurrency();
        self.emit_start_message(files.len(), concurrency, &plugins);

        let tracker = ProgressTracker::new(files.len(), self.output);
        let worker = TaskOptimizer::new(
            Arc::clone(&self.store),
            Arc::clone(&self.compressor),
            Arc::new(plugins),
        );

        let summary = Self::process_files_concurrently(files, worker, concurrency, tracker.clone()).await;

        // the bar is cleared so the summary line is printed once
        tracker.finish();
        match self.output {
            OutputMode::Json => JsonMessage::complete(&summary, start_time.elapsed().as_secs_f64()).emit(),
            OutputMode::Quiet | OutputMode::ProgressBar => info!("{}", summary.format_summary()),
        }

        summary
    }

    /// Spawn one task per file; each holds a permit for its whole pipeline
    async fn process_files_concurrently(
        files: Vec<FilePair>,
        worker: TaskOptimizer,
        concurrency: usize,
        tracker: ProgressTracker,
    ) -> BatchSummary {
        let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
        let mut pairs = Vec::with_capacity(files.len());
        let mut tasks = Vec::with_capacity(files.len());

        for pair in files {
            let semaphore = Arc::clone(&semaphore);
            let worker = worker.clone();
            let tracker = tracker.clone();
            pairs.push(pair.clone());

            tasks.push(tokio::spawn(async move {
                // the semaphore is never closed
                let _permit = semaphore.acquire_owned().await.ok();
                let result = worker.process_file(&pair).await;
                tracker.record_result(&result).await;
            }));
        }

        // completion waits for every task, including the ones that fail
        let outcomes = futures::future::join_all(tasks).await;
        for (pair, outcome) in pairs.iter().zip(outcomes) {
            if let Err(e) = outcome {
                error!("Task for {} aborted: {}", pair.src.display(), e);
                tracker
                    .record_result(&FileResult::failed(pair, 0, e.to_string()))
                    .await;
            }
        }

        tracker.snapshot().await
    }

    fn emit_start_message(&self, total_files: usize, concurrency: usize, plugins: &PluginChain) {
        let names = chain_names(plugins);
        match self.output {
            OutputMode::Json => JsonMessage::start(total_files, concurrency, names).emit(),
            _ => info!(
                "Minifying {} file(s) with {} worker(s), plugins: [{}]",
                total_files,
                concurrency,
                names.join(", ")
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PluginError;
    use crate::plugin::{Plugin, PluginOptions};
    use async_trait::async_trait;
    use tempfile::TempDir;

    struct DropLast;

    #[async_trait]
    impl Plugin for DropLast {
        fn name(&self) -> &str {
            "drop-last"
        }

        async fn optimize(&self, mut input: Vec<u8>) -> Result<Vec<u8>, PluginError> {
            input.pop();
            Ok(input)
        }
    }

    #[tokio::test]
    async fn test_run_on_local_files() {
        let temp_dir = TempDir::new().unwrap();
        let src_dir = temp_dir.path().join("src");
        std::fs::create_dir_all(&src_dir).unwrap();
        std::fs::write(src_dir.join("a.png"), vec![1u8; 100]).unwrap();
        std::fs::write(src_dir.join("b.png"), vec![1u8; 200]).unwrap();

        let files = vec![
            FilePair::new(src_dir.join("a.png"), temp_dir.path().join("dist/a.png")),
            FilePair::new(src_dir.join("b.png"), temp_dir.path().join("dist/b.png")),
            FilePair::new(src_dir.join("gone.png"), temp_dir.path().join("dist/gone.png")),
        ];

        let registry =
            PluginRegistry::new().register("drop-last", |_: &PluginOptions| Ok(Arc::new(DropLast) as Arc<dyn Plugin>));
        let minifier = ImageMinifier::new(OptimizationOptions {
            concurrency: Some(2),
            ..Default::default()
        })
        .with_registry(registry);

        let summary = minifier.run(files).await;

        assert_eq!(summary.total_files_improved, 2);
        assert_eq!(summary.total_original_bytes, 300);
        assert_eq!(summary.total_saved_bytes, 2);
        assert_eq!(summary.files_failed, 1);
        assert_eq!(std::fs::read(temp_dir.path().join("dist/b.png")).unwrap().len(), 199);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let minifier = ImageMinifier::new(OptimizationOptions::default()).with_registry(PluginRegistry::new());
        assert!(minifier.resolve_plugins().is_empty());

        let summary = minifier.run(Vec::new()).await;
        assert_eq!(summary, BatchSummary::default());
        assert_eq!(summary.format_summary(), "Minified 0 images");
    }
}
