//! Supportdesk: local harness for the support agent's tool layer.
//!
//! Usage:
//!   supportdesk init                 Write a default config file
//!   supportdesk tools                Print the tool schema snapshot
//!   supportdesk prompt               Print the system prompt
//!   supportdesk call <tool> --args   Run one tool call
//!   supportdesk session              Run JSON tool calls from stdin

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use supportdesk::agent::build_system_prompt;
use supportdesk::config::{self, SupportConfig};
use supportdesk::http::ReqwestTransport;
use supportdesk::knowledge::{HttpKnowledgeBase, KnowledgeBase};
use supportdesk::tools;
use supportdesk::{Dispatcher, GlobalData, Session, ToolCall, ToolResult};

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "supportdesk")]
#[command(version = "0.1.0")]
#[command(about = "Declarative tool runtime for conversational support agents")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to supportdesk home directory (default: ~/.supportdesk).
    #[arg(long)]
    home: Option<String>,

    /// Log level (debug, info, warn, error). Overrides the config file.
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a default config file into the home directory.
    Init {
        /// Overwrite an existing config.
        #[arg(long)]
        force: bool,
    },

    /// Print the tool schema snapshot as JSON.
    Tools,

    /// Print the system prompt.
    Prompt,

    /// Invoke one tool and print the result and merged global data.
    Call {
        /// Tool name.
        name: String,

        /// Arguments as a JSON object.
        #[arg(long, default_value = "{}")]
        args: String,

        /// Initial global data as a JSON object.
        #[arg(long, default_value = "{}")]
        global: String,
    },

    /// Read one JSON tool call per line from stdin and run them in one session.
    Session,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let home_dir = match &cli.home {
        Some(home) => PathBuf::from(shellexpand::tilde(home).into_owned()),
        None => config::default_home_dir(),
    };
    let config_path = config::config_path(&home_dir);
    let cfg = config::load_config(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    // Initialize logging
    let level = cli.log_level.clone().unwrap_or_else(|| cfg.log_level.clone());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Init { force } => cmd_init(&config_path, force),
        Commands::Tools => cmd_tools(&cfg),
        Commands::Prompt => cmd_prompt(&cfg),
        Commands::Call { name, args, global } => cmd_call(&cfg, &name, &args, &global).await,
        Commands::Session => cmd_session(&cfg).await,
    }
}

// ---------------------------------------------------------------------------
// Command implementations
// ---------------------------------------------------------------------------

fn cmd_init(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Config already exists at {} (use --force to overwrite)",
            config_path.display()
        );
    }
    config::save_config(&SupportConfig::default(), config_path)?;
    println!(
        "{} Wrote default config to {}",
        ">>>".green().bold(),
        config_path.display()
    );
    Ok(())
}

fn cmd_tools(cfg: &SupportConfig) -> Result<()> {
    let registry = tools::build_registry(cfg, knowledge_base(cfg)?)?;
    let snapshot = registry.schema_snapshot();
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

fn cmd_prompt(cfg: &SupportConfig) -> Result<()> {
    let registry = tools::build_registry(cfg, knowledge_base(cfg)?)?;
    print!(
        "{}",
        build_system_prompt(&cfg.prompt_sections, &registry.schema_snapshot())
    );
    Ok(())
}

async fn cmd_call(cfg: &SupportConfig, name: &str, args: &str, global: &str) -> Result<()> {
    let dispatcher = bootstrap(cfg)?;
    let arguments: serde_json::Value =
        serde_json::from_str(args).context("--args is not valid JSON")?;
    let global: GlobalData =
        serde_json::from_str(global).context("--global must be a JSON object")?;

    let mut session = Session::with_global_data(global);
    let result = dispatcher.invoke(name, &arguments, &mut session).await;
    print_result(name, &result);
    print_global_data(session.global_data())?;
    Ok(())
}

async fn cmd_session(cfg: &SupportConfig) -> Result<()> {
    let dispatcher = bootstrap(cfg)?;
    let mut session = Session::new();
    info!("Session {} started for '{}'", session.id(), cfg.name);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let call: ToolCall = match serde_json::from_str(line) {
            Ok(call) => call,
            Err(e) => {
                warn!("Skipping malformed call: {}", e);
                eprintln!("{} {}", "Invalid call:".red().bold(), e);
                continue;
            }
        };

        let result = dispatcher.invoke_call(&call, &mut session).await;
        print_result(&call.name, &result);

        if let Some(transfer) = session.transfer() {
            println!(
                "{} transfer to {}: \"{}\"",
                "<<<".red().bold(),
                transfer.target,
                transfer.final_message
            );
            break;
        }
    }

    print_global_data(session.global_data())?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build the dispatcher: HTTP transport, optional knowledge base, registry.
fn bootstrap(cfg: &SupportConfig) -> Result<Dispatcher> {
    let transport = ReqwestTransport::new(cfg.webhook_timeout())
        .context("Failed to build webhook transport")?;
    let registry = tools::build_registry(cfg, knowledge_base(cfg)?)?;
    Ok(Dispatcher::new(
        Arc::new(registry),
        Arc::new(transport),
        cfg.webhook_timeout(),
    ))
}

fn knowledge_base(cfg: &SupportConfig) -> Result<Option<Arc<dyn KnowledgeBase>>> {
    if !cfg.knowledge_base_enabled() {
        return Ok(None);
    }
    let kb: Arc<dyn KnowledgeBase> = Arc::new(HttpKnowledgeBase::new(
        &cfg.knowledge_base.url,
        cfg.webhook_timeout(),
    )?);
    Ok(Some(kb))
}

fn print_result(name: &str, result: &ToolResult) {
    let label = format!("[{}]", name);
    match result.error {
        Some(kind) => println!(
            "{} {} {}",
            label.bold(),
            format!("({:?})", kind).red(),
            result.text
        ),
        None => println!("{} {}", label.green().bold(), result.text),
    }
    if let Some(context) = &result.context {
        println!("    {} {}", "context:".dimmed(), context);
    }
}

fn print_global_data(global: &GlobalData) -> Result<()> {
    println!("{}", "--- global data ---".dimmed());
    println!("{}", serde_json::to_string_pretty(global)?);
    Ok(())
}
