use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

use encounter_forge::commands;
use encounter_forge::config::settings_io::load_settings;

#[derive(Parser)]
#[command(version, about = "Inspect and edit encounter files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Show {
        #[arg(short, long)]
        path: PathBuf,
    },
    SetEnvironment {
        #[arg(short, long)]
        path: PathBuf,
        #[arg(short, long)]
        value: String,
    },
    Duplicate {
        #[arg(short, long)]
        path: PathBuf,
        #[arg(short, long)]
        out: PathBuf,
    },
    Check {
        #[arg(short, long)]
        path: PathBuf,
    },
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(err) = run(cli.command) {
        error!(error = %format!("{err:#}"), "command_failed");
        std::process::exit(1);
    }
}

fn run(command: Commands) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    match command {
        Commands::Show { path } => commands::show(&path, &load_settings(), &mut stdout),
        Commands::SetEnvironment { path, value } => commands::set_environment(&path, &value),
        Commands::Duplicate { path, out } => commands::duplicate(&path, &out),
        Commands::Check { path } => commands::check(&path, &mut stdout),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}
