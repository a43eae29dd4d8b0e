use clap::Parser;
use taskman::cli::commands::Cli;
use taskman::cli::handlers;
use taskman::tui;

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

/// Bare `tm` opens the full-screen UI; any subcommand goes through the CLI
/// dispatcher.
fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match &cli.command {
        None => tui::run(cli.project_dir.as_deref()),
        Some(_) => handlers::dispatch(cli),
    }
}
