//! # Tool Path Resolver
//!
//! Finds the external optimizer binaries used by the default plugins:
//! - an override directory from `IMAGEMIN_TOOLS_DIR` (bundled tools)
//! - the system `PATH`

use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable pointing at a directory of bundled tools
pub const TOOLS_DIR_ENV: &str = "IMAGEMIN_TOOLS_DIR";

/// Resolves tool names to executable paths
#[derive(Debug, Clone, Default)]
pub struct ToolResolver {
    /// Directory checked before the search paths
    tools_dir: Option<PathBuf>,
    search_paths: Vec<PathBuf>,
}

impl ToolResolver {
    /// Create a resolver from `IMAGEMIN_TOOLS_DIR` and `PATH`
    pub fn from_env() -> Self {
        let tools_dir = env::var_os(TOOLS_DIR_ENV)
            .map(PathBuf::from)
            .filter(|dir| dir.is_dir());
        if let Some(ref dir) = tools_dir {
            debug!("Using bundled tools directory: {}", dir.display());
        }

        let search_paths = env::var_os("PATH")
            .map(|paths| env::split_paths(&paths).collect())
            .unwrap_or_default();

        Self {
            tools_dir,
            search_paths,
        }
    }

    /// Create a resolver with explicit directories
    pub fn with_search_paths(tools_dir: Option<PathBuf>, search_paths: Vec<PathBuf>) -> Self {
        Self {
            tools_dir,
            search_paths,
        }
    }

    /// Resolve the path to a specific tool
    pub fn resolve_tool(&self, tool_name: &str) -> Option<PathBuf> {
        let file_name = Self::executable_name(tool_name);

        if let Some(ref tools_dir) = self.tools_dir {
            // tools/{name} or tools/{name}/{name}
            let candidates = [
                tools_dir.join(&file_name),
                tools_dir.join(tool_name).join(&file_name),
            ];
            if let Some(path) = candidates.into_iter().find(|p| p.is_file()) {
                debug!("Using bundled tool: {} -> {}", tool_name, path.display());
                return Some(path);
            }
        }

        let found = self
            .search_paths
            .iter()
            .map(|dir| dir.join(&file_name))
            .find(|path| path.is_file());

        match found {
            Some(ref path) => debug!("Using system tool: {} -> {}", tool_name, path.display()),
            None => debug!("Tool not found: {}", tool_name),
        }
        found
    }

    /// Resolve a tool or explain how to install it
    pub fn check_tool_with_instructions(&self, tool_name: &str) -> Result<PathBuf, String> {
        self.resolve_tool(tool_name).ok_or_else(|| {
            format!(
                "{} not found in {} or PATH (install with: {})",
                tool_name,
                TOOLS_DIR_ENV,
                Self::install_instructions(tool_name)
            )
        })
    }

    /// Get a report of tool availability
    pub fn tools_report(&self, tools: &[&str]) -> String {
        let mut report = String::from("Tool availability:\n");
        for tool in tools {
            match self.check_tool_with_instructions(tool) {
                Ok(path) if self.is_bundled(&path) => {
                    report.push_str(&format!("  ✅ {} -> {} (bundled)\n", tool, path.display()))
                }
                Ok(path) => report.push_str(&format!("  ✅ {} -> {}\n", tool, path.display())),
                Err(msg) => report.push_str(&format!("  ❌ {}\n", msg)),
            }
        }
        report
    }

    /// Check whether a path is inside the bundled tools directory
    pub fn is_bundled(&self, path: &Path) -> bool {
        self.tools_dir
            .as_deref()
            .is_some_and(|dir| path.starts_with(dir))
    }

    fn executable_name(tool_name: &str) -> String {
        if cfg!(windows) {
            format!("{}.exe", tool_name)
        } else {
            tool_name.to_string()
        }
    }

    fn install_instructions(tool_name: &str) -> &'static str {
        match tool_name {
            "gifsicle" => "apt-get install gifsicle",
            "jpegtran" => "apt-get install libjpeg-turbo-progs",
            "optipng" => "apt-get install optipng",
            "svgo" => "npm install -g svgo",
            _ => "your package manager",
        }
    }
}
