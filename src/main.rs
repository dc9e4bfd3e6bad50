use argo_query::cli::{run, Cli};
use argo_query::error::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}
