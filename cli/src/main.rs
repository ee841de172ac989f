use clap::Parser;
use colored::Colorize;
use infrastructure::config::Config;
use presentation::cli::{Cli, CliApp};
use shared::logging::init_logging;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.apply_overrides(Config::load());
    let mut app = CliApp::new(&config);
    if let Err(err) = app.run(cli).await {
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        std::process::exit(1);
    }
}
