//! Delegated multi-plugin compression call.
//!
//! The optimizer hands a buffer and the whole chain to a [`Compressor`] in a
//! single call. The default [`PipelineCompressor`] feeds the buffer through
//! the plugins in order; each plugin passes through formats it does not
//! handle, so a mixed chain (GIF, JPEG, PNG, SVG) touches each file with the
//! matching codec only.

use super::Plugin;
use crate::error::PluginError;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::trace;

/// Runs a plugin chain over one buffer
#[async_trait]
pub trait Compressor: Send + Sync {
    async fn compress(
        &self,
        input: Vec<u8>,
        plugins: &[Arc<dyn Plugin>],
    ) -> Result<Vec<u8>, PluginError>;
}

/// Pipes the buffer through every plugin of the chain, in order
#[derive(Debug, Default, Clone, Copy)]
pub struct PipelineCompressor;

#[async_trait]
impl Compressor for PipelineCompressor {
    async fn compress(
        &self,
        input: Vec<u8>,
        plugins: &[Arc<dyn Plugin>],
    ) -> Result<Vec<u8>, PluginError> {
        let mut buf = input;
        for plugin in plugins {
            let before = buf.len();
            buf = plugin.optimize(buf).await?;
            trace!("{}: {} -> {} bytes", plugin.name(), before, buf.len());
        }
        Ok(buf)
    }
}
