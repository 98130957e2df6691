//! Command-line Pocket Cube twister.

mod cli;

fn main() -> eyre::Result<()> {
    use clap::Parser;

    // Initialize logging.
    env_logger::builder().init();
    color_eyre::install().expect("error initializing panic handler");

    let args = cli::Args::parse();
    cli::exec(args)
}
