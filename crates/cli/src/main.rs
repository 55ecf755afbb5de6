use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use console::{style, Term};
use runner_core::Layout;
use tracing_subscriber::EnvFilter;

/// runner - render configuration templates, then hand off to the service process
#[derive(Parser)]
#[command(name = "runner")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration root directory (overrides $runner_base)
    #[arg(long)]
    base: Option<PathBuf>,

    /// Environment name (overrides $environment)
    #[arg(long)]
    environment: Option<String>,
}

fn main() -> Result<()> {
    // Default to info so the per-template progress lines are visible
    // without RUST_LOG set.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .without_time()
        .init();

    let cli = Cli::parse();
    let term = Term::stderr();

    let layout = Layout::resolve(cli.base, cli.environment);
    tracing::debug!(
        base = %layout.base.display(),
        environment = %layout.environment,
        "layout resolved"
    );

    term.write_line(&format!(
        "{} runner v{}",
        style("::").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    ))?;
    term.write_line(&format!(
        "{} Using configuration from {}",
        style("::").cyan().bold(),
        layout.base.display()
    ))?;
    term.write_line(&format!(
        "{} Using environment {}",
        style("::").cyan().bold(),
        layout.environment
    ))?;

    let handoff = match runner_core::run(&layout) {
        Ok(handoff) => handoff,
        Err(e) => {
            term.write_line(&format!("{} {}", style("error:").red().bold(), e))?;
            std::process::exit(1);
        }
    };

    term.write_line(&format!(
        "{} Template generation complete, about to exec replacement process",
        style("::").green().bold()
    ))?;
    term.write_line(&format!(
        "{} Calling {}",
        style("::").cyan().bold(),
        handoff.exec
    ))?;

    // handoff only returns when the exec itself fails
    let err = match runner_platform::handoff(&handoff.exec) {
        Ok(never) => match never {},
        Err(e) => e,
    };

    term.write_line(&format!("{} {}", style("error:").red().bold(), err))?;
    std::process::exit(1);
}
