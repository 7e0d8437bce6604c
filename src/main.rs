use clap::Parser;
use yarukoto::cli::{run_cli, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    yarukoto::otel::init_logging()?;
    run_cli(cli)
}
