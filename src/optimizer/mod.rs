//! # Optimizer Module
//!
//! Separa le responsabilità in sottomoduli:
//! - `image_minifier`: batch driver con tetto di concorrenza
//! - `task_optimizer`: pipeline per singolo file
//! - `progress_tracker`: accumulatore condiviso e reporting
//! - `path_resolver`: mapping input → coppie sorgente/destinazione

pub mod image_minifier;
pub mod path_resolver;
pub mod progress_tracker;
pub mod task_optimizer;

pub use image_minifier::ImageMinifier;
pub use path_resolver::PathResolver;
pub use progress_tracker::{OutputMode, ProgressTracker};
pub use task_optimizer::{FilePair, FileResult, FileStatus, TaskOptimizer};
