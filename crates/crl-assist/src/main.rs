//! crl-assist CLI - ultrasound classifier with AI interpretation and a CRL Q&A assistant.
//!
//! Uploads an ultrasound image to the classification service, shows the label
//! and probability, optionally asks the language model for a clinical-style
//! reading, and hosts a chat about Crown-Rump Length.
//!
//! # Usage
//!
//! ```bash
//! # Guided, menu-driven session
//! crl-assist
//!
//! # Classify a single image
//! crl-assist classify scan.png
//!
//! # Chat about CRL
//! crl-assist chat
//!
//! # View configuration
//! crl-assist config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// crl-assist - ultrasound classifier with AI interpretation and a CRL Q&A assistant.
#[derive(Parser, Debug)]
#[command(name = "crl-assist")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify an ultrasound image and explain the result
    Classify(cli::classify::ClassifyArgs),

    /// Ask questions about Crown-Rump Length (CRL) and fetal growth
    Chat(cli::chat::ChatArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match crl_assist_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `crl-assist config path`."
            );
            crl_assist_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("crl-assist v{}", crl_assist_core::VERSION);

    match cli.command {
        Some(Commands::Classify(args)) => cli::classify::execute(args, &config).await,
        Some(Commands::Chat(args)) => cli::chat::execute(args, &config).await,
        Some(Commands::Config(args)) => cli::config::execute(args).await,
        None if console::Term::stderr().is_term() => cli::interactive::run(&config).await,
        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
            Ok(())
        }
    }
}
