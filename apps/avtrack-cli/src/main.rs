//! avtrack - aircraft maintenance status from the command line

use avtrack_cli::logging::init_logging;
use avtrack_cli::{resolve_config, run, Cli};
use avtrack_core::{ConfigLoader, Result};
use clap::Parser;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = resolve_config(&cli, ConfigLoader::new())?;

    // Held until exit so the file writer flushes
    let _guard = init_logging(&config.logging, cli.verbose)?;
    tracing::debug!(fleet = %config.data.fleet_path.display(), "Configuration resolved");

    run(&cli, &config, &mut std::io::stdout().lock())
}
