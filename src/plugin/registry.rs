//! # Plugin Registry
//!
//! Ordered mapping from plugin name to a constructor that may fail.
//! Resolving the default chain tries every entry in order and keeps the
//! ones that build; a plugin whose tool is missing is skipped with a
//! warning and never aborts the batch.

use super::external::{ExternalToolPlugin, Tool};
use super::{chain_names, Plugin, PluginChain, PluginOptions};
use crate::error::{MinifyError, PluginError};
use crate::tool_resolver::ToolResolver;
use std::sync::Arc;
use tracing::{debug, warn};

/// Builds one plugin instance from the shared options
pub type PluginConstructor =
    Box<dyn Fn(&PluginOptions) -> Result<Arc<dyn Plugin>, PluginError> + Send + Sync>;

/// Capability-checked plugin registry
pub struct PluginRegistry {
    entries: Vec<(String, PluginConstructor)>,
}

impl PluginRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Registry with gifsicle, jpegtran, optipng and svgo, in that order
    pub fn with_defaults(resolver: Arc<ToolResolver>) -> Self {
        Tool::DEFAULTS.into_iter().fold(Self::new(), |registry, tool| {
            let resolver = Arc::clone(&resolver);
            registry.register(tool.name(), move |options: &PluginOptions| {
                let plugin = ExternalToolPlugin::new(tool, &resolver, options)?;
                Ok(Arc::new(plugin) as Arc<dyn Plugin>)
            })
        })
    }

    /// Append an entry; later entries run later in the chain
    pub fn register<F>(mut self, name: impl Into<String>, constructor: F) -> Self
    where
        F: Fn(&PluginOptions) -> Result<Arc<dyn Plugin>, PluginError> + Send + Sync + 'static,
    {
        self.entries.push((name.into(), Box::new(constructor)));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    /// Build a single named plugin; used for explicit plugin lists
    pub fn build(&self, name: &str, options: &PluginOptions) -> Result<Arc<dyn Plugin>, MinifyError> {
        let (_, constructor) = self
            .entries
            .iter()
            .find(|(n, _)| n == name)
            .ok_or_else(|| MinifyError::UnknownPlugin(name.to_string()))?;
        constructor(options).map_err(|e| MinifyError::Configuration(e.to_string()))
    }

    /// Instantiate every entry, skipping the ones that fail to load
    pub fn load_defaults(&self, options: &PluginOptions) -> PluginChain {
        let chain: PluginChain = self
            .entries
            .iter()
            .filter_map(|(name, constructor)| match constructor(options) {
                Ok(plugin) => Some(plugin),
                Err(e) => {
                    warn!("Couldn't load default plugin \"{}\": {}", name, e);
                    None
                }
            })
            .collect();

        debug!("Default plugin chain: [{}]", chain_names(&chain).join(", "));
        chain
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::with_defaults(Arc::new(ToolResolver::from_env()))
    }
}

/// Pick the chain for a batch: a non-empty explicit list is used verbatim,
/// otherwise the registry's default set is loaded
pub fn resolve_plugins(
    use_plugins: Option<&PluginChain>,
    registry: &PluginRegistry,
    options: &PluginOptions,
) -> PluginChain {
    match use_plugins {
        Some(chain) if !chain.is_empty() => {
            debug!("Using explicit plugin chain: [{}]", chain_names(chain).join(", "));
            chain.clone()
        }
        _ => registry.load_defaults(options),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Named(&'static str);

    #[async_trait]
    impl Plugin for Named {
        fn name(&self) -> &str {
            self.0
        }

        async fn optimize(&self, input: Vec<u8>) -> Result<Vec<u8>, PluginError> {
            Ok(input)
        }
    }

    fn ok(name: &'static str) -> impl Fn(&PluginOptions) -> Result<Arc<dyn Plugin>, PluginError> {
        move |_| Ok(Arc::new(Named(name)) as Arc<dyn Plugin>)
    }

    fn missing(name: &'static str) -> impl Fn(&PluginOptions) -> Result<Arc<dyn Plugin>, PluginError> {
        move |_| {
            Err(PluginError::Unavailable {
                name: name.to_string(),
                reason: "not installed".to_string(),
            })
        }
    }

    #[test]
    fn test_missing_default_is_skipped() {
        let registry = PluginRegistry::new()
            .register("a", ok("a"))
            .register("b", missing("b"))
            .register("c", ok("c"))
            .register("d", ok("d"));

        let chain = registry.load_defaults(&PluginOptions::default());
        assert_eq!(chain_names(&chain), vec!["a", "c", "d"]);
    }

    #[test]
    fn test_all_missing_gives_empty_chain() {
        let registry = PluginRegistry::new()
            .register("a", missing("a"))
            .register("b", missing("b"));
        assert!(registry.load_defaults(&PluginOptions::default()).is_empty());
    }

    #[test]
    fn test_explicit_chain_skips_registry() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let registry = PluginRegistry::new().register("a", move |_: &PluginOptions| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(Named("a")) as Arc<dyn Plugin>)
        });

        let explicit: PluginChain = vec![Arc::new(Named("custom")), Arc::new(Named("other"))];
        let chain = resolve_plugins(Some(&explicit), &registry, &PluginOptions::default());

        assert_eq!(chain_names(&chain), vec!["custom", "other"]);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_empty_explicit_chain_falls_back() {
        let registry = PluginRegistry::new().register("a", ok("a"));
        let chain = resolve_plugins(Some(&Vec::new()), &registry, &PluginOptions::default());
        assert_eq!(chain_names(&chain), vec!["a"]);
    }

    #[test]
    fn test_build_named_plugin() {
        let registry = PluginRegistry::new().register("a", ok("a")).register("b", missing("b"));

        assert_eq!(registry.build("a", &PluginOptions::default()).unwrap().name(), "a");
        assert!(matches!(
            registry.build("b", &PluginOptions::default()),
            Err(MinifyError::Configuration(_))
        ));
        assert!(matches!(
            registry.build("zopfli", &PluginOptions::default()),
            Err(MinifyError::UnknownPlugin(_))
        ));
    }

    #[test]
    fn test_default_registry_order() {
        let registry = PluginRegistry::with_defaults(Arc::new(ToolResolver::with_search_paths(None, Vec::new())));
        let names: Vec<&str> = registry.entries.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["gifsicle", "jpegtran", "optipng", "svgo"]);
        assert!(registry.contains("svgo"));
        // nothing on the search path
        assert!(registry.load_defaults(&PluginOptions::default()).is_empty());
    }
}
