//! # Plugin Module
//!
//! Compression plugins are opaque transforms: bytes in, bytes out (or a
//! failure). The optimizer never looks inside them.
//!
//! - `registry`: default plugin set and chain resolution
//! - `compressor`: the single delegated call that runs a whole chain
//! - `external`: plugins backed by command-line optimizers

pub mod compressor;
pub mod external;
pub mod registry;

pub use compressor::{Compressor, PipelineCompressor};
pub use external::ExternalToolPlugin;
pub use registry::{resolve_plugins, PluginRegistry};

use crate::error::PluginError;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// A compression transform applied to a whole file buffer
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Name used in logs and configuration
    fn name(&self) -> &str;

    /// Return the optimized buffer, or the input untouched when the format
    /// is not one this plugin handles
    async fn optimize(&self, input: Vec<u8>) -> Result<Vec<u8>, PluginError>;
}

/// Ordered plugin sequence shared by every file of a batch
pub type PluginChain = Vec<Arc<dyn Plugin>>;

/// Options handed to every default plugin constructor
#[derive(Debug, Clone)]
pub struct PluginOptions {
    /// gifsicle `--interlace`
    pub interlaced: bool,
    /// optipng `-o<level>`
    pub optimization_level: u8,
    /// jpegtran `-progressive`
    pub progressive: bool,
    /// Nested svgo plugin configuration
    pub plugins: Option<Vec<serde_json::Value>>,
    /// Upper bound for a single tool invocation
    pub tool_timeout: Duration,
}

impl Default for PluginOptions {
    fn default() -> Self {
        Self {
            interlaced: true,
            optimization_level: 3,
            progressive: true,
            plugins: None,
            tool_timeout: Duration::from_secs(120),
        }
    }
}

/// Names of the plugins in a chain, in order
pub fn chain_names(chain: &[Arc<dyn Plugin>]) -> Vec<String> {
    chain.iter().map(|p| p.name().to_string()).collect()
}
