use clap::Parser;
use pmmap_tui::Cli;
use pmmap_tui::run_main;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_main(cli)
}
