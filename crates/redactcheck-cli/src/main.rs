mod audit_cmd;
mod clean_cmd;
mod cli;
mod page_range;
mod shared;

use clap::Parser;
use cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        cli::Commands::Audit {
            ref file,
            ref pages,
            ref format,
            ref output,
        } => audit_cmd::run(file, pages.as_deref(), format, output.as_deref()),
        cli::Commands::Clean {
            ref file,
            ref output,
            ref audit,
            ref format,
        } => clean_cmd::run(file, output.as_deref(), audit.as_deref(), format),
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}
