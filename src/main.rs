use clap::Parser;
use tracing::warn;

use ytd::commands::{self, Cli};
use ytd::AppConfig;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = AppConfig::load_checked(cli.config.as_deref());
    let config = loaded.as_ref().ok().cloned().unwrap_or_default();
    ytd::init(&config, cli.verbose);
    if let Err(err) = &loaded {
        warn!("Configuration unusable ({:#}), using defaults", err);
    }

    let code = match commands::dispatch(cli, &config).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("Error: {err}");
            err.exit_code()
        }
    };
    std::process::exit(code);
}
