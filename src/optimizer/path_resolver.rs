//! # Path Resolution Module
//!
//! Centralizza la logica che trasforma gli input della CLI (file o
//! directory) in coppie sorgente/destinazione.
//!
//! - Senza directory di output: minificazione in-place (`dest == src`)
//! - Con directory di output: la struttura relativa sotto la radice
//!   dell'input viene preservata

use crate::{file_manager::FileManager, optimizer::task_optimizer::FilePair};
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Utility per calcolare i path di output in modo centralizzato
pub struct PathResolver;

impl PathResolver {
    /// Expand inputs into file pairs. Directories are walked for supported
    /// images; explicit files are taken as given when their extension is
    /// supported.
    pub fn resolve_inputs(inputs: &[PathBuf], output_dir: Option<&Path>) -> Result<Vec<FilePair>> {
        let mut pairs = Vec::new();

        for input in inputs {
            if input.is_dir() {
                for file in FileManager::find_image_files(input)? {
                    pairs.push(Self::pair_for(&file, input, output_dir));
                }
            } else if input.is_file() {
                if !FileManager::is_supported_format(input) {
                    warn!("Skipping unsupported file: {}", input.display());
                    continue;
                }
                let root = input.parent().unwrap_or(Path::new(""));
                pairs.push(Self::pair_for(input, root, output_dir));
            } else {
                return Err(anyhow::anyhow!("Input does not exist: {}", input.display()));
            }
        }

        debug!("Resolved {} file pair(s)", pairs.len());
        Ok(pairs)
    }

    /// Pair for one file found under `root`
    pub fn pair_for(file: &Path, root: &Path, output_dir: Option<&Path>) -> FilePair {
        match output_dir {
            Some(output_dir) => FilePair::new(file, Self::get_output_path(file, root, output_dir)),
            None => FilePair::in_place(file),
        }
    }

    /// Destination under `output_dir`, keeping the path relative to `root`
    pub fn get_output_path(file: &Path, root: &Path, output_dir: &Path) -> PathBuf {
        let relative = match file.strip_prefix(root) {
            Ok(rel) if !rel.as_os_str().is_empty() => rel.to_path_buf(),
            _ => {
                debug!("{} is not under {}, using file name only", file.display(), root.display());
                file.file_name().map(PathBuf::from).unwrap_or_default()
            }
        };
        output_dir.join(relative)
    }
}
