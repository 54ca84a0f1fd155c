//! # External Tool Plugins
//!
//! The default plugins wrap well-known command-line optimizers:
//!
//! | Plugin   | Format | Tool invocation |
//! |----------|--------|-----------------|
//! | gifsicle | GIF    | `gifsicle --no-warnings [--interlace] --optimize=N -o out in` |
//! | jpegtran | JPEG   | `jpegtran -copy none [-progressive] -optimize -outfile out in` |
//! | optipng  | PNG    | `optipng -strip all -quiet -i 0/1 -o N -out out in` |
//! | svgo     | SVG    | `svgo [--config cfg] -i in -o out` |
//!
//! Every invocation works on a private temporary directory: the buffer is
//! written to `input.<ext>`, the tool writes `output.<ext>`, and the result
//! is read back. Buffers of another format are returned untouched without
//! spawning anything.

use super::{Plugin, PluginOptions};
use crate::error::PluginError;
use crate::image_format::ImageKind;
use crate::tool_resolver::ToolResolver;
use async_trait::async_trait;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tempfile::TempPath;
use tokio::process::Command;
use tracing::debug;

/// Optimizers available as default plugins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Gifsicle,
    Jpegtran,
    Optipng,
    Svgo,
}

impl Tool {
    /// Default plugin order
    pub const DEFAULTS: [Tool; 4] = [Tool::Gifsicle, Tool::Jpegtran, Tool::Optipng, Tool::Svgo];

    /// Look a tool up by its plugin name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::DEFAULTS.into_iter().find(|tool| tool.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Gifsicle => "gifsicle",
            Self::Jpegtran => "jpegtran",
            Self::Optipng => "optipng",
            Self::Svgo => "svgo",
        }
    }

    /// Format the tool accepts
    pub fn kind(self) -> ImageKind {
        match self {
            Self::Gifsicle => ImageKind::Gif,
            Self::Jpegtran => ImageKind::Jpeg,
            Self::Optipng => ImageKind::Png,
            Self::Svgo => ImageKind::Svg,
        }
    }

    fn args(self, input: &str, output: &str, options: &PluginOptions, config: Option<&str>) -> Vec<String> {
        match self {
            Self::Gifsicle => {
                let mut args = crate::args!["--no-warnings"];
                if options.interlaced {
                    args.push("--interlace".to_string());
                }
                // gifsicle only knows levels 1-3
                let level = options.optimization_level.clamp(1, 3);
                args.extend(crate::args![format!("--optimize={}", level), "-o", output, input]);
                args
            }
            Self::Jpegtran => {
                let mut args = crate::args!["-copy", "none"];
                if options.progressive {
                    args.push("-progressive".to_string());
                }
                args.extend(crate::args!["-optimize", "-outfile", output, input]);
                args
            }
            Self::Optipng => crate::args![
                "-strip",
                "all",
                "-quiet",
                "-i",
                if options.interlaced { 1 } else { 0 },
                "-o",
                options.optimization_level,
                "-out",
                output,
                input,
            ],
            Self::Svgo => {
                let mut args = Vec::new();
                if let Some(config) = config {
                    args.extend(crate::args!["--config", config]);
                }
                args.extend(crate::args!["-i", input, "-o", output]);
                args
            }
        }
    }
}

/// A plugin that shells out to one optimizer binary
pub struct ExternalToolPlugin {
    tool: Tool,
    tool_path: PathBuf,
    options: PluginOptions,
    /// svgo config file, removed when the plugin is dropped
    svgo_config: Option<TempPath>,
}

impl std::fmt::Debug for ExternalToolPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExternalToolPlugin")
            .field("tool", &self.tool)
            .field("tool_path", &self.tool_path)
            .finish()
    }
}

impl ExternalToolPlugin {
    /// Build a plugin, failing with `Unavailable` when the binary is missing
    pub fn new(tool: Tool, resolver: &ToolResolver, options: &PluginOptions) -> Result<Self, PluginError> {
        let tool_path = resolver
            .check_tool_with_instructions(tool.name())
            .map_err(|reason| PluginError::Unavailable {
                name: tool.name().to_string(),
                reason,
            })?;
        Self::with_tool_path(tool, tool_path, options)
    }

    /// Build a plugin around an already resolved binary
    pub fn with_tool_path(tool: Tool, tool_path: PathBuf, options: &PluginOptions) -> Result<Self, PluginError> {
        let svgo_config = match (&options.plugins, tool) {
            (Some(plugins), Tool::Svgo) => Some(Self::write_svgo_config(plugins)?),
            _ => None,
        };

        Ok(Self {
            tool,
            tool_path,
            options: options.clone(),
            svgo_config,
        })
    }

    /// svgo only reads JS configs; a JSON array is a valid JS expression
    fn write_svgo_config(plugins: &[serde_json::Value]) -> Result<TempPath, PluginError> {
        let plugins = serde_json::to_string(plugins).map_err(|e| PluginError::Other(e.to_string()))?;
        let mut file = tempfile::Builder::new()
            .prefix("svgo.config.")
            .suffix(".mjs")
            .tempfile()?;
        writeln!(file, "export default {{ plugins: {} }};", plugins)?;
        file.flush()?;
        Ok(file.into_temp_path())
    }

    /// Command-line arguments for one invocation
    pub fn args_for(&self, input: &Path, output: &Path) -> Vec<String> {
        let config = self.svgo_config.as_ref().map(|p| p.to_string_lossy().to_string());
        self.tool.args(
            &input.to_string_lossy(),
            &output.to_string_lossy(),
            &self.options,
            config.as_deref(),
        )
    }

    async fn run_tool(&self, input: &[u8]) -> Result<Vec<u8>, PluginError> {
        let workdir = tempfile::tempdir()?;
        let ext = self.tool.kind().extension();
        let input_path = workdir.path().join(format!("input.{}", ext));
        let output_path = workdir.path().join(format!("output.{}", ext));
        tokio::fs::write(&input_path, input).await?;

        let args = self.args_for(&input_path, &output_path);
        debug!("Running {} {:?}", self.tool_path.display(), args);

        let start_time = std::time::Instant::now();
        let mut command = Command::new(&self.tool_path);
        command
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.options.tool_timeout, command.output())
            .await
            .map_err(|_| PluginError::Timeout {
                tool: self.tool.name().to_string(),
                secs: self.options.tool_timeout.as_secs(),
            })??;
        let elapsed = start_time.elapsed();

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PluginError::ToolFailed {
                tool: self.tool.name().to_string(),
                status: output.status.to_string(),
                stderr: stderr.trim().chars().take(300).collect(),
            });
        }

        debug!("{} completed in {:?}", self.tool.name(), elapsed);
        Ok(tokio::fs::read(&output_path).await?)
    }
}

#[async_trait]
impl Plugin for ExternalToolPlugin {
    fn name(&self) -> &str {
        self.tool.name()
    }

    async fn optimize(&self, input: Vec<u8>) -> Result<Vec<u8>, PluginError> {
        if ImageKind::detect(&input) != Some(self.tool.kind()) {
            return Ok(input);
        }
        self.run_tool(&input).await
    }
}
