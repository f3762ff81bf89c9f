use anyhow::Result;
use hpp2one::{cli::parse_args, run_hpp2one};
use log::LevelFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = parse_args()?;

    env_logger::Builder::new()
        .filter_level(match config.verbosity {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        })
        .init();

    run_hpp2one(config).await
}
