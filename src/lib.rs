//! # imagemin
//!
//! Questo è il modulo principale della libreria che espone tutte le API pubbliche.
//!
//! ## Responsabilità:
//! - Definisce la struttura modulare dell'applicazione
//! - Espone i tipi e le funzioni principali tramite re-exports
//! - Fornisce un'interfaccia pulita per il main.rs e per altri consumatori
//!
//! ## Architettura dei moduli:
//! - `config`: Configurazione serializzabile e opzioni runtime del batch
//! - `error`: Tipi di errore per plugin, file e configurazione
//! - `plugin`: Trait `Plugin`, registry dei plugin di default, compressore
//! - `optimizer`: Batch driver, worker per file, tracker, path mapping
//! - `store`: Seam di lettura/scrittura file
//! - `file_manager`: Discovery immagini e formattazione dei report
//! - `tool_resolver`: Ricerca dei tool esterni
//! - `image_format`: Riconoscimento del formato dai byte
//! - `progress`: `BatchSummary` e progress bar
//! - `json_output`: Eventi NDJSON per chiamanti programmatici
//!
//! ## Utilizzo:
//! ```rust,no_run
//! use imagemin::{FilePair, ImageMinifier, OptimizationOptions};
//!
//! # async fn demo() {
//! let minifier = ImageMinifier::new(OptimizationOptions::default());
//! let summary = minifier
//!     .run(vec![FilePair::new("assets/logo.png", "dist/logo.png")])
//!     .await;
//! println!("{}", summary.format_summary());
//! # }
//! ```

pub mod config;
pub mod error;
pub mod file_manager;
pub mod image_format;
pub mod json_output;
pub mod optimizer;
pub mod plugin;
pub mod progress;
pub mod store;
pub mod tool_resolver;
pub mod utils;

pub use config::{Config, OptimizationOptions};
pub use error::{MinifyError, PluginError};
pub use optimizer::{FilePair, FileResult, FileStatus, ImageMinifier, OutputMode};
pub use plugin::{Plugin, PluginChain, PluginRegistry};
pub use progress::BatchSummary;
pub use store::{FileStore, LocalFileStore};
