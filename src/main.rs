use clap::{Parser, Subcommand};
use rgenviews::{
    catalog::VIEW_CATALOG,
    encoder,
    logger::{self, LogLevel, LoggerConfig},
    output, render, GeminiConfig, ViewOrchestrator,
};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "rgenviews")]
#[command(about = "Generate six photographic views of a subject from one reference image")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error); overrides LOG_LEVEL
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate all six views for an image
    Generate {
        /// Reference image (PNG, JPEG, WebP, GIF, ...)
        image: PathBuf,

        /// Directory the generated views are written to
        #[arg(short, long, default_value = "views")]
        out_dir: PathBuf,

        /// Gemini model, overrides GEMINI_MODEL
        #[arg(short, long)]
        model: Option<String>,

        /// Per-view timeout in seconds, overrides VIEW_TIMEOUT_SECS
        #[arg(short, long)]
        timeout_secs: Option<u64>,

        /// Print the run as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List the views and their prompts
    Views,

    /// Serve the upload page and generation endpoints
    #[cfg(feature = "server")]
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(short, long)]
        port: Option<u16>,
    },
}

fn init_logging(cli: &Cli) {
    let level = cli
        .log_level
        .clone()
        .or_else(|| env::var("LOG_LEVEL").ok())
        .and_then(|name| LogLevel::parse(&name))
        .unwrap_or(LogLevel::Info);

    let config = if cli.json_logs {
        LoggerConfig::production()
    } else {
        LoggerConfig::new()
    };

    if let Err(e) = logger::init_with_config(config.with_level(level)) {
        eprintln!("{}", e);
    }
}

fn load_gemini_config(model: Option<String>, timeout_secs: Option<u64>) -> Option<GeminiConfig> {
    let mut config = match GeminiConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("❌ {}", e);
            return None;
        }
    };
    if let Some(model) = model {
        config = config.with_model(model);
    }
    if let Some(secs) = timeout_secs {
        config = config.with_view_timeout(Duration::from_secs(secs));
    }
    logger::log_config_info(&config);
    Some(config)
}

async fn generate(
    image: PathBuf,
    out_dir: PathBuf,
    model: Option<String>,
    timeout_secs: Option<u64>,
    json: bool,
) -> ExitCode {
    let Some(config) = load_gemini_config(model, timeout_secs) else {
        return ExitCode::from(2);
    };

    let orchestrator = match ViewOrchestrator::from_config(config) {
        Ok(orchestrator) => orchestrator,
        Err(e) => {
            log::error!("❌ {}", e);
            return ExitCode::from(2);
        }
    };

    let encoded = match encoder::encode_file(&image) {
        Ok(encoded) => encoded,
        Err(e) => {
            log::error!("❌ {}", e);
            return ExitCode::FAILURE;
        }
    };

    let run = match orchestrator.generate_views(&encoded).await {
        Ok(run) => run,
        Err(e) => {
            log::error!("❌ {}", e);
            return ExitCode::FAILURE;
        }
    };

    let stem = image
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "view".to_string());
    let saved = output::save_run(&run, &out_dir, &stem);

    if json {
        match serde_json::to_string_pretty(&run) {
            Ok(body) => println!("{}", body),
            Err(e) => log::error!("❌ Failed to serialize run: {}", e),
        }
    } else {
        println!("{}", render::summary_table(&run));
    }

    match saved {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("❌ Failed to save views to {}: {}", out_dir.display(), e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(feature = "server")]
async fn serve(host: Option<String>, port: Option<u16>) -> ExitCode {
    use rgenviews::{server, ImageGenerator, ServerConfig};
    use std::sync::Arc;

    let Some(config) = load_gemini_config(None, None) else {
        return ExitCode::from(2);
    };
    let view_timeout = config.view_timeout;
    let client = match rgenviews::GeminiClient::new(config) {
        Ok(client) => client,
        Err(e) => {
            log::error!("❌ {}", e);
            return ExitCode::from(2);
        }
    };

    let generator: Arc<dyn ImageGenerator> = Arc::new(client);
    let mut orchestrator = ViewOrchestrator::new(generator);
    if let Some(timeout) = view_timeout {
        orchestrator = orchestrator.with_view_timeout(timeout);
    }

    let mut server_config = ServerConfig::from_env();
    if let Some(host) = host {
        server_config = server_config.with_host(host);
    }
    if let Some(port) = port {
        server_config = server_config.with_port(port);
    }

    match server::run_server(orchestrator, server_config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("❌ Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv_loaded = dotenv::dotenv().is_ok();
    let cli = Cli::parse();
    init_logging(&cli);

    logger::log_startup_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    if !dotenv_loaded {
        log::debug!("No .env file found, using system environment variables");
    }

    match cli.command {
        Commands::Generate {
            image,
            out_dir,
            model,
            timeout_secs,
            json,
        } => generate(image, out_dir, model, timeout_secs, json).await,
        Commands::Views => {
            for descriptor in VIEW_CATALOG.iter() {
                println!("{:<8} {}", descriptor.label, descriptor.prompt_text);
            }
            ExitCode::SUCCESS
        }
        #[cfg(feature = "server")]
        Commands::Serve { host, port } => serve(host, port).await,
    }
}
