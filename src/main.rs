use clap::Parser;

use release_herald::{Result, cli, command};

fn initialize_logger(debug: bool) -> Result<()> {
    let filter = if debug {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };

    let config = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("release_herald")
        .build();

    simplelog::TermLogger::init(
        filter,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli_args = cli::Args::parse();

    initialize_logger(cli_args.debug)?;

    match &cli_args.command {
        cli::Command::Release { repo, bump } => {
            command::release::execute(&cli_args, repo, *bump).await
        }
        cli::Command::Handle => command::handle::execute(&cli_args).await,
    }
}
