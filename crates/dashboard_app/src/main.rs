mod platform;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    let config = platform::config::Cli::parse().into_config()?;
    platform::run_app(config)
}
