use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use colored::*;
use gallery_scan_cli::config::{ConfigManager, ScanOverrides, get_config};
use gallery_scan_cli::error::{CliError, CliResult, ErrorContext, ExitCode};
use gallery_scan_cli::orchestrators::{ScanOrchestrator, ScanRequest};
use gallery_scan_cli::output::OutputFormat;
use gallery_scan_cli::terminal;
use gallery_scan_core::{EntryOrder, RootFailurePolicy, SubtreeErrorPolicy};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gallery-scan")]
#[command(
    author,
    version,
    about = "List every file below a directory, depth first, for a photo gallery",
    long_about = None
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the files below a directory
    Scan(ScanArgs),

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args)]
struct ScanArgs {
    /// Directory to scan (defaults to scan.default_root, then Pictures/Screenshots)
    root: Option<PathBuf>,

    /// Sibling order
    #[arg(long, value_enum)]
    order: Option<OrderArg>,

    /// What to do with a subdirectory that cannot be listed
    #[arg(long = "on-error", value_enum)]
    on_error: Option<OnErrorArg>,

    /// What to do when the root itself cannot be listed
    #[arg(long, value_enum)]
    root_failure: Option<RootFailureArg>,

    /// Follow symbolic links (cycles are detected)
    #[arg(long)]
    follow_links: bool,

    /// Maximum sibling directories listed at once
    #[arg(long, value_name = "N")]
    concurrency: Option<usize>,

    /// Stop after this many seconds and print what was found so far
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Columns for grid output
    #[arg(long, value_name = "N")]
    columns: Option<usize>,

    /// Only list image files
    #[arg(long)]
    images_only: bool,

    /// Include patterns (glob patterns relative to ROOT, can be specified multiple times)
    #[arg(short = 'i', long = "include", value_name = "PATTERN")]
    include_patterns: Vec<String>,

    /// Exclude patterns (glob patterns, can be specified multiple times, overrides includes)
    #[arg(short = 'e', long = "exclude", value_name = "PATTERN")]
    exclude_patterns: Vec<String>,

    /// Disable the progress spinner
    #[arg(long)]
    no_progress: bool,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Get a configuration value
    Get {
        /// Configuration key (e.g., scan.order)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., scan.order)
        key: String,

        /// Value to set
        value: String,
    },

    /// List all configuration values
    List,

    /// Print the configuration file path
    Path,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum OrderArg {
    /// Sort siblings by name
    Name,
    /// Keep the order the filesystem lists them in
    Listing,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum OnErrorArg {
    /// Skip silently
    Ignore,
    /// Skip and report
    Collect,
    /// Stop the walk
    Abort,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum RootFailureArg {
    /// Print nothing
    Empty,
    /// Exit with an error
    Fail,
}

impl From<OrderArg> for EntryOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Name => EntryOrder::Name,
            OrderArg::Listing => EntryOrder::Listing,
        }
    }
}

impl From<OnErrorArg> for SubtreeErrorPolicy {
    fn from(arg: OnErrorArg) -> Self {
        match arg {
            OnErrorArg::Ignore => SubtreeErrorPolicy::Ignore,
            OnErrorArg::Collect => SubtreeErrorPolicy::Collect,
            OnErrorArg::Abort => SubtreeErrorPolicy::Abort,
        }
    }
}

impl From<RootFailureArg> for RootFailurePolicy {
    fn from(arg: RootFailureArg) -> Self {
        match arg {
            RootFailureArg::Empty => RootFailurePolicy::EmptyResult,
            RootFailureArg::Fail => RootFailurePolicy::Fail,
        }
    }
}

impl ScanArgs {
    fn into_request(self) -> ScanRequest {
        ScanRequest {
            root: self.root,
            overrides: ScanOverrides {
                order: self.order.map(Into::into),
                on_subtree_error: self.on_error.map(Into::into),
                root_failure: self.root_failure.map(Into::into),
                follow_links: self.follow_links,
                max_concurrency: self.concurrency,
                timeout_seconds: self.timeout,
                columns: self.columns,
                no_progress: self.no_progress,
            },
            format: self.format,
            images_only: self.images_only,
            include_patterns: self.include_patterns,
            exclude_patterns: self.exclude_patterns,
        }
    }
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on debug flag
    if cli.debug {
        env_logger::Builder::from_env(env_logger::Env::default())
            .filter_level(log::LevelFilter::Debug)
            .filter_module("gallery_scan_core", log::LevelFilter::Debug)
            .filter_module("gallery_scan_cli", log::LevelFilter::Debug)
            .format_timestamp_millis()
            .init();
        eprintln!("Debug logging enabled");
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    if !terminal::supports_ansi() {
        colored::control::set_override(false);
    }

    let result = match cli.command {
        Commands::Scan(args) => scan_command(args).await,
        Commands::Config { command } => config_command(command),
        Commands::Completions { shell } => {
            generate_completions(shell);
            Ok(ExitCode::Success)
        }
    };

    match result {
        Ok(code) => code.into(),
        Err(e) => {
            eprint!("{}", e.format_for_user(cli.debug));
            e.exit_code().into()
        }
    }
}

async fn scan_command(args: ScanArgs) -> CliResult<ExitCode> {
    let config = get_config().map_err(|e| {
        CliError::general(&format!("{e:#}"))
            .with_suggestion("Check the file with 'gallery-scan config list'")
    })?;
    if !config.output.color_enabled {
        colored::control::set_override(false);
    }

    let request = args.into_request();
    log::debug!("Scan request: {request:?}");

    let orchestrator = ScanOrchestrator::new(config);
    let summary = orchestrator
        .run(&request, &mut std::io::stdout().lock(), &mut std::io::stderr())
        .await?;
    Ok(summary.exit_code())
}

fn config_command(command: ConfigCommand) -> CliResult<ExitCode> {
    let mut manager = ConfigManager::new();

    match command {
        ConfigCommand::Get { key } => {
            let value = manager
                .get(&key)
                .map_err(|e| CliError::misuse(&format!("{e:#}")))?;
            match value {
                Some(value) => println!("{value}"),
                None => eprintln!("{key} is not set"),
            }
        }
        ConfigCommand::Set { key, value } => {
            manager
                .set(&key, &value)
                .map_err(|e| CliError::misuse(&format!("{e:#}")))?;
            eprintln!("{}", format!("Set {key} = {value}").green());
            eprintln!(
                "Configuration saved to: {}",
                manager.get_config_path().display()
            );
        }
        ConfigCommand::List => {
            let items = manager.list()?;
            eprintln!("Config file: {}", manager.get_config_path().display());

            // Group items by section
            let mut sections: BTreeMap<String, Vec<(String, String)>> = BTreeMap::new();
            for (key, value) in items {
                let (section, field) = key
                    .split_once('.')
                    .map(|(section, field)| (section.to_string(), field.to_string()))
                    .unwrap_or_else(|| ("general".to_string(), key.clone()));
                sections.entry(section).or_default().push((field, value));
            }

            for (section, items) in sections {
                println!("[{}]", section.yellow());
                for (key, value) in items {
                    println!("  {} = {}", key.cyan(), value);
                }
            }
        }
        ConfigCommand::Path => {
            println!("{}", manager.get_config_path().display());
        }
    }

    Ok(ExitCode::Success)
}

fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();

    generate(shell, &mut cmd, name, &mut std::io::stdout());
}
