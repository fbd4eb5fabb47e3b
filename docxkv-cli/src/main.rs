use anyhow::Result;
use clap::Parser;
use docxkv::{run, Cli};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    log::debug!("{cli:?}");

    let code = run(cli)?;
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
