use clap::Parser;

use commsboard::cli::{Cli, Commands};
use commsboard::config::{get_config, init_config_from};
use commsboard::system::logging::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_config_from(&cli.config);

    let config = get_config();
    let _guard = init_logging(&config.logging)?;

    match cli.command {
        None | Some(Commands::Serve) => commsboard::runtime::modes::run_server().await,
        Some(cmd) => {
            if let Err(e) = commsboard::interfaces::cli::run_cli_command(cmd).await {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
