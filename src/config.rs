//! # Configuration Management Module
//!
//! Questo modulo gestisce tutta la configurazione del task di minificazione.
//!
//! ## Responsabilità:
//! - Definisce `Config`, la configurazione serializzabile (file JSON + CLI)
//! - Definisce `OptimizationOptions`, le opzioni runtime del batch (con le
//!   istanze dei plugin espliciti)
//! - Validazione dei parametri e valori di default
//!
//! ## Parametri di configurazione:
//! - `interlaced`: GIF/PNG interlacciati (default: true)
//! - `optimizationLevel`: livello di ottimizzazione lossless 0-7 (default: 3)
//! - `progressive`: JPEG progressivi (default: true)
//! - `concurrency`: file processati in parallelo (default: numero di core)
//! - `use`: lista esplicita di plugin, sostituisce il set di default
//! - `svgoPlugins`: configurazione dei plugin interni di svgo
//! - `toolTimeoutSecs`: timeout per singola invocazione di un tool (default: 120)
//! - `jsonOutput`: eventi JSON su stdout (default: false)
//! - `outputPath`: directory di output (default: None = in-place)
//!
//! ## Esempio di file:
//! ```json
//! {
//!   "optimizationLevel": 5,
//!   "concurrency": 2,
//!   "svgoPlugins": [{ "name": "removeViewBox", "active": false }]
//! }
//! ```

use crate::error::MinifyError;
use crate::plugin::external::Tool;
use crate::plugin::{chain_names, PluginChain, PluginOptions, PluginRegistry};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Highest optimization level understood by the lossless tools
pub const MAX_OPTIMIZATION_LEVEL: u8 = 7;

/// Serializable task configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub interlaced: bool,
    pub optimization_level: u8,
    pub progressive: bool,
    /// None = one slot per available core
    pub concurrency: Option<usize>,
    /// Explicit plugin names, replacing the default set
    #[serde(rename = "use")]
    pub use_plugins: Option<Vec<String>>,
    pub svgo_plugins: Option<Vec<serde_json::Value>>,
    pub tool_timeout_secs: u64,
    pub json_output: bool,
    /// None = minify in place
    pub output_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interlaced: true,
            optimization_level: 3,
            progressive: true,
            concurrency: None,
            use_plugins: None,
            svgo_plugins: None,
            tool_timeout_secs: 120,
            json_output: false,
            output_path: None,
        }
    }
}

impl Config {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.optimization_level > MAX_OPTIMIZATION_LEVEL {
            return Err(anyhow::anyhow!(
                "Optimization level must be between 0 and {}",
                MAX_OPTIMIZATION_LEVEL
            ));
        }

        if self.concurrency == Some(0) {
            return Err(anyhow::anyhow!("Concurrency must be greater than 0"));
        }

        if self.tool_timeout_secs == 0 {
            return Err(anyhow::anyhow!("Tool timeout must be greater than 0"));
        }

        if let Some(ref output_path) = self.output_path {
            if output_path.exists() && !output_path.is_dir() {
                return Err(anyhow::anyhow!(
                    "Output path is not a directory: {}",
                    output_path.display()
                ));
            }
        }

        Ok(())
    }

    /// Build runtime options; explicit plugin names are built strictly
    pub fn to_options(&self, registry: &PluginRegistry) -> Result<OptimizationOptions> {
        self.validate()?;

        let mut options = OptimizationOptions {
            interlaced: self.interlaced,
            optimization_level: self.optimization_level,
            progressive: self.progressive,
            concurrency: self.concurrency,
            use_plugins: None,
            svgo_plugins: self.svgo_plugins.clone(),
            tool_timeout: Duration::from_secs(self.tool_timeout_secs),
        };

        if let Some(ref names) = self.use_plugins {
            let unknown: Vec<&str> = names
                .iter()
                .map(String::as_str)
                .filter(|name| !registry.contains(name))
                .collect();
            if !unknown.is_empty() {
                return Err(MinifyError::UnknownPlugin(unknown.join(", ")).into());
            }

            let plugin_options = options.plugin_options();
            let chain = names
                .iter()
                .map(|name| registry.build(name, &plugin_options))
                .collect::<Result<PluginChain, _>>()?;
            options.use_plugins = Some(chain);
        }

        Ok(options)
    }

    /// External tools this configuration would run, for `--check-tools`
    pub fn tools(&self) -> Vec<Tool> {
        match self.use_plugins {
            Some(ref names) if !names.is_empty() => {
                names.iter().filter_map(|name| Tool::from_name(name)).collect()
            }
            _ => Tool::DEFAULTS.to_vec(),
        }
    }

    /// Load configuration from file, defaults when the file is missing
    pub async fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}

/// Runtime options for one batch
#[derive(Clone)]
pub struct OptimizationOptions {
    pub interlaced: bool,
    pub optimization_level: u8,
    pub progressive: bool,
    pub concurrency: Option<usize>,
    /// Non-empty list bypasses default plugin resolution
    pub use_plugins: Option<PluginChain>,
    pub svgo_plugins: Option<Vec<serde_json::Value>>,
    pub tool_timeout: Duration,
}

impl Default for OptimizationOptions {
    fn default() -> Self {
        Self {
            interlaced: true,
            optimization_level: 3,
            progressive: true,
            concurrency: None,
            use_plugins: None,
            svgo_plugins: None,
            tool_timeout: Duration::from_secs(120),
        }
    }
}

impl std::fmt::Debug for OptimizationOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptimizationOptions")
            .field("interlaced", &self.interlaced)
            .field("optimization_level", &self.optimization_level)
            .field("progressive", &self.progressive)
            .field("concurrency", &self.concurrency)
            .field("use_plugins", &self.use_plugins.as_deref().map(chain_names))
            .field("svgo_plugins", &self.svgo_plugins)
            .field("tool_timeout", &self.tool_timeout)
            .finish()
    }
}

impl OptimizationOptions {
    /// Options passed to plugin constructors, with `svgo_plugins`
    /// remapped to the svgo `plugins` option
    pub fn plugin_options(&self) -> PluginOptions {
        PluginOptions {
            interlaced: self.interlaced,
            optimization_level: self.optimization_level,
            progressive: self.progressive,
            plugins: self.svgo_plugins.clone(),
            tool_timeout: self.tool_timeout,
        }
    }

    /// Concurrency cap for the batch
    pub fn effective_concurrency(&self) -> usize {
        self.concurrency
            .filter(|&n| n > 0)
            .unwrap_or_else(default_concurrency)
    }
}

/// One slot per available core
pub fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PluginError;
    use crate::plugin::Plugin;
    use async_trait::async_trait;
    use std::sync::Arc;
    use tempfile::TempDir;

    struct Noop;

    #[async_trait]
    impl Plugin for Noop {
        fn name(&self) -> &str {
            "noop"
        }

        async fn optimize(&self, input: Vec<u8>) -> Result<Vec<u8>, PluginError> {
            Ok(input)
        }
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.optimization_level = 8;
        assert!(config.validate().is_err());

        config.optimization_level = 7;
        config.concurrency = Some(0);
        assert!(config.validate().is_err());

        config.concurrency = Some(2);
        config.tool_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.interlaced);
        assert_eq!(config.optimization_level, 3);
        assert!(config.progressive);
        assert_eq!(config.concurrency, None);
        assert!(config.use_plugins.is_none());
        assert!(!config.json_output);
    }

    #[test]
    fn test_parse_task_options() {
        let config: Config = serde_json::from_str(
            r#"{
                "optimizationLevel": 5,
                "progressive": false,
                "use": ["optipng"],
                "svgoPlugins": [{ "name": "removeViewBox", "active": false }]
            }"#,
        )
        .unwrap();

        assert_eq!(config.optimization_level, 5);
        assert!(!config.progressive);
        assert!(config.interlaced);
        assert_eq!(config.use_plugins, Some(vec!["optipng".to_string()]));
        assert_eq!(config.svgo_plugins.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn test_svgo_plugins_remapped() {
        let options = OptimizationOptions {
            svgo_plugins: Some(vec![serde_json::json!({ "name": "cleanupIDs" })]),
            ..Default::default()
        };
        let plugin_options = options.plugin_options();
        assert_eq!(plugin_options.plugins, options.svgo_plugins);
        assert_eq!(plugin_options.optimization_level, 3);
    }

    #[test]
    fn test_effective_concurrency() {
        let options = OptimizationOptions::default();
        assert_eq!(options.effective_concurrency(), default_concurrency());

        let options = OptimizationOptions {
            concurrency: Some(3),
            ..Default::default()
        };
        assert_eq!(options.effective_concurrency(), 3);
    }

    #[test]
    fn test_to_options_builds_explicit_plugins() {
        let registry =
            PluginRegistry::new().register("noop", |_: &PluginOptions| Ok(Arc::new(Noop) as Arc<dyn Plugin>));

        let config = Config {
            use_plugins: Some(vec!["noop".to_string()]),
            ..Default::default()
        };
        let options = config.to_options(&registry).unwrap();
        let chain = options.use_plugins.unwrap();
        assert_eq!(chain_names(&chain), vec!["noop"]);

        let config = Config {
            use_plugins: Some(vec!["pngquant".to_string()]),
            ..Default::default()
        };
        let err = config.to_options(&registry).unwrap_err();
        assert!(err.to_string().contains("pngquant"));
    }

    #[test]
    fn test_unknown_plugins_reported_together() {
        let registry =
            PluginRegistry::new().register("noop", |_: &PluginOptions| Ok(Arc::new(Noop) as Arc<dyn Plugin>));

        let config = Config {
            use_plugins: Some(vec!["pngquant".to_string(), "noop".to_string(), "zopfli".to_string()]),
            ..Default::default()
        };
        let err = config.to_options(&registry).unwrap_err();
        assert_eq!(err.to_string(), "Unknown plugin: pngquant, zopfli");
    }

    #[test]
    fn test_tools_follow_explicit_names() {
        assert_eq!(Config::default().tools(), Tool::DEFAULTS.to_vec());

        let config = Config {
            use_plugins: Some(vec!["svgo".to_string(), "custom".to_string(), "optipng".to_string()]),
            ..Default::default()
        };
        assert_eq!(config.tools(), vec![Tool::Svgo, Tool::Optipng]);

        let config = Config {
            use_plugins: Some(Vec::new()),
            ..Default::default()
        };
        assert_eq!(config.tools(), Tool::DEFAULTS.to_vec());
    }

    #[tokio::test]
    async fn test_config_save_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("imagemin.json");

        let original_config = Config {
            optimization_level: 6,
            concurrency: Some(2),
            use_plugins: Some(vec!["jpegtran".to_string(), "optipng".to_string()]),
            json_output: true,
            ..Default::default()
        };

        original_config.save_to_file(&config_path).await.unwrap();
        let loaded_config = Config::from_file(&config_path).await.unwrap();
        assert_eq!(loaded_config, original_config);

        let missing = Config::from_file(&temp_dir.path().join("missing.json")).await.unwrap();
        assert_eq!(missing, Config::default());
    }
}
