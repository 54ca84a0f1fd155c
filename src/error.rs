//! # Error Types Module
//!
//! Questo modulo definisce i tipi di errore custom della libreria.
//!
//! ## Categorie di errori:
//! - `PluginError`: errori di un singolo plugin (tool mancante, exit code
//!   diverso da zero, timeout, I/O sui file temporanei)
//! - `MinifyError`: errori a livello di file (lettura, compressione,
//!   scrittura) e di configurazione
//!
//! Gli errori per-file non risalgono mai al batch driver: vengono convertiti
//! in un `FileResult` con stato `Failed` e loggati come warning.
//!
//! ## Esempio:
//! ```rust
//! use imagemin::error::PluginError;
//!
//! let err = PluginError::Unavailable {
//!     name: "optipng".to_string(),
//!     reason: "not found in PATH".to_string(),
//! };
//! assert!(err.to_string().contains("optipng"));
//! ```

use std::path::PathBuf;

/// Errors raised by a single compression plugin
#[derive(thiserror::Error, Debug)]
pub enum PluginError {
    #[error("Plugin \"{name}\" unavailable: {reason}")]
    Unavailable { name: String, reason: String },

    #[error("{tool} failed with {status}: {stderr}")]
    ToolFailed {
        tool: String,
        status: String,
        stderr: String,
    },

    #[error("{tool} timed out after {secs}s")]
    Timeout { tool: String, secs: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Errors raised while minifying a file or preparing a batch
#[derive(thiserror::Error, Debug)]
pub enum MinifyError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Compression failed: {0}")]
    Compress(#[from] PluginError),

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown plugin: {0}")]
    UnknownPlugin(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_error_mentions_path() {
        let err = MinifyError::Read {
            path: PathBuf::from("img/logo.png"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        let msg = err.to_string();
        assert!(msg.contains("img/logo.png"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_plugin_error_converts() {
        let err: MinifyError = PluginError::Timeout {
            tool: "svgo".to_string(),
            secs: 5,
        }
        .into();
        assert_eq!(err.to_string(), "Compression failed: svgo timed out after 5s");
    }
}
