use clap::Parser;
use episode_console_lib::Cli;

fn main() -> anyhow::Result<()> {
    episode_console_lib::run(Cli::parse())
}
