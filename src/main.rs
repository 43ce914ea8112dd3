use anyhow::Result;
use clap::Parser;
use sandftp::core_cli::ServerCli;
use sandftp::core_log::logger::init_logger;
use sandftp::{server, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = ServerCli::parse();

    init_logger(args.verbose);

    // Defaults, then the configuration file, then flags
    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };
    args.apply(&mut config);

    server::run(config).await
}
