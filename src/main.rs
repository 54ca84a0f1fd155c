//! # imagemin - Main Entry Point
//!
//! Questo è il punto di ingresso principale dell'applicazione.
//!
//! ## Responsabilità:
//! - Parsing degli argomenti della command line con `clap`
//! - Inizializzazione del sistema di logging con `tracing` (su stderr)
//! - Caricamento della configurazione (file JSON + override da CLI)
//! - Costruzione delle coppie sorgente/destinazione e avvio del batch
//!
//! ## Flusso di esecuzione:
//! 1. Parsa gli argomenti CLI
//! 2. Configura il logging (INFO o DEBUG a seconda del flag verbose)
//! 3. Carica `--config` e applica gli override
//! 4. Risolve i plugin espliciti (`--use`) e valida la configurazione
//! 5. Espande gli input in coppie e avvia `ImageMinifier`
//!
//! Warning per-file e plugin mancanti non cambiano l'exit status.
//!
//! ## Esempio di utilizzo:
//! ```bash
//! imagemin assets/img --output dist/img --optimization-level 5 --verbose
//! imagemin logo.svg --use svgo --config imagemin.json
//! ```

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use imagemin::{
    json_output::JsonMessage,
    optimizer::PathResolver,
    plugin::external::Tool,
    tool_resolver::ToolResolver,
    Config, ImageMinifier, OutputMode, PluginRegistry,
};

#[derive(Parser)]
#[command(name = "imagemin")]
#[command(about = "Minify PNG, JPEG, GIF and SVG images")]
struct Args {
    /// Image files or directories to minify
    #[arg(required_unless_present_any = ["check_tools", "save_config"])]
    inputs: Vec<PathBuf>,

    /// Output directory (if not specified, images are minified in place)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum number of files processed at once (default: number of cores)
    #[arg(short, long)]
    concurrency: Option<usize>,

    /// Optimization level for the lossless plugins (0-7)
    #[arg(short = 'l', long)]
    optimization_level: Option<u8>,

    /// Disable interlaced GIF/PNG output
    #[arg(long)]
    no_interlaced: bool,

    /// Disable progressive JPEG output
    #[arg(long)]
    no_progressive: bool,

    /// Explicit plugin list replacing the defaults (e.g. optipng,svgo)
    #[arg(long = "use", value_delimiter = ',')]
    use_plugins: Option<Vec<String>>,

    /// Timeout for a single tool invocation, in seconds
    #[arg(long)]
    tool_timeout: Option<u64>,

    /// Emit newline-delimited JSON events on stdout
    #[arg(long)]
    json: bool,

    /// Report which optimizer tools are available and exit
    #[arg(long)]
    check_tools: bool,

    /// Write the effective configuration to a file and exit
    #[arg(long)]
    save_config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// CLI flags take precedence over the configuration file
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(ref output) = self.output {
            config.output_path = Some(output.clone());
        }
        if let Some(concurrency) = self.concurrency {
            config.concurrency = Some(concurrency);
        }
        if let Some(level) = self.optimization_level {
            config.optimization_level = level;
        }
        if self.no_interlaced {
            config.interlaced = false;
        }
        if self.no_progressive {
            config.progressive = false;
        }
        if let Some(ref names) = self.use_plugins {
            config.use_plugins = Some(names.clone());
        }
        if let Some(secs) = self.tool_timeout {
            config.tool_timeout_secs = secs;
        }
        if self.json {
            config.json_output = true;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging; stdout is reserved for JSON events
    let default_level = if args.verbose { "debug" } else { "info" };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = match args.config {
        Some(ref path) => Config::from_file(path).await?,
        None => Config::default(),
    };
    args.apply_overrides(&mut config);

    if let Some(ref path) = args.save_config {
        config.validate()?;
        config.save_to_file(path).await?;
        info!("Configuration saved to {}", path.display());
        return Ok(());
    }

    let resolver = Arc::new(ToolResolver::from_env());

    if args.check_tools {
        let names: Vec<&str> = config.tools().into_iter().map(Tool::name).collect();
        print!("{}", resolver.tools_report(&names));
        return Ok(());
    }

    if let Err(e) = run(config, resolver, &args.inputs).await {
        if args.json {
            JsonMessage::error(e.to_string(), e.chain().nth(1).map(|s| s.to_string())).emit();
        }
        return Err(e);
    }

    Ok(())
}

async fn run(config: Config, resolver: Arc<ToolResolver>, inputs: &[PathBuf]) -> Result<()> {
    let registry = PluginRegistry::with_defaults(resolver);
    let options = config.to_options(&registry)?;

    // Validate and create output directory if specified
    if let Some(ref output_dir) = config.output_path {
        if !output_dir.exists() {
            tokio::fs::create_dir_all(output_dir).await?;
            info!("Created output directory: {}", output_dir.display());
        }
    }

    let files = PathResolver::resolve_inputs(inputs, config.output_path.as_deref())?;

    let output = if config.json_output {
        OutputMode::Json
    } else {
        OutputMode::ProgressBar
    };

    ImageMinifier::new(options)
        .with_registry(registry)
        .with_output(output)
        .run(files)
        .await;

    Ok(())
}
