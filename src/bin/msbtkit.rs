//! msbtkit command-line entry point

fn main() -> anyhow::Result<()> {
    msbtkit::cli::run_cli()
}
