use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use matchjury::app::{DetectOverrides, run_detect_command, run_windows_command};
use matchjury::cli::{Cli, Commands, ConfigAction};
use matchjury::config::{CONFIG_TEMPLATE, Config};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);
    tracing::debug!(version = %matchjury::version_string(), "matchjury starting");

    match cli.command {
        Commands::Detect {
            input,
            out_dir,
            tag,
            model,
            backend_url,
            threshold,
            timeout,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let overrides = DetectOverrides {
                out_dir,
                tag,
                model,
                backend_url,
                threshold,
                timeout_secs: timeout,
            };
            run_detect_command(config, input, overrides, cli.quiet).await?;
        }
        Commands::Windows { input } => {
            let config = load_config(cli.config.as_deref())?;
            run_windows_command(config, input)?;
        }
        Commands::Config { action } => handle_config_command(action, cli.config.as_deref())?,
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "matchjury",
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}

/// Install the stderr log subscriber.
///
/// `-q` → errors only, default → info, `-v` → debug, `-vv` → trace.
/// `RUST_LOG` takes precedence when set.
fn init_logging(quiet: bool, verbose: u8) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("matchjury={level},warn")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Load configuration from file or use defaults.
///
/// Priority order:
/// 1. Custom config path from CLI (--config)
/// 2. Default config path (~/.config/matchjury/config.toml)
/// 3. Built-in defaults
///
/// Environment variable overrides are applied on top.
fn load_config(custom_path: Option<&std::path::Path>) -> Result<Config> {
    let config = match (custom_path, Config::default_path()) {
        (Some(path), _) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        (None, Some(default_path)) => Config::load_or_default(&default_path)
            .with_context(|| format!("Failed to load config from {}", default_path.display()))?,
        (None, None) => Config::default(),
    };

    Ok(config.with_env_overrides())
}

fn handle_config_command(
    action: ConfigAction,
    custom_path: Option<&std::path::Path>,
) -> Result<()> {
    match action {
        ConfigAction::Dump => print!("{CONFIG_TEMPLATE}"),
        ConfigAction::Path => match custom_path
            .map(std::path::Path::to_path_buf)
            .or_else(Config::default_path)
        {
            Some(path) => println!("{}", path.display()),
            None => anyhow::bail!("Could not determine config directory"),
        },
        ConfigAction::Show => {
            let config = load_config(custom_path)?;
            println!("{}", toml::to_string_pretty(&config)?);
        }
    }
    Ok(())
}
