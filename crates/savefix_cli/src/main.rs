use std::env;
use std::io;
use std::process::ExitCode;

use savefix_cli::{parse_args, run, usage_text, ConsoleProgress, ParsedCommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    init_tracing();

    let args = env::args().skip(1).collect::<Vec<_>>();
    if args.is_empty() {
        println!("{}", usage_text());
        return ExitCode::SUCCESS;
    }

    let cli = match parse_args(&args) {
        Ok(ParsedCommand::Help) => {
            println!("{}", usage_text());
            return ExitCode::SUCCESS;
        }
        Ok(ParsedCommand::Run(cli)) => cli,
        Err(message) => {
            error!("{message}");
            eprintln!("\n{}", usage_text());
            return ExitCode::from(1);
        }
    };

    info!(version = env!("CARGO_PKG_VERSION"), "=== savefix startup ===");
    let mut progress = ConsoleProgress::new(io::stderr());
    match run(&cli, &mut progress) {
        Ok(outcome) => {
            if let Some(written) = outcome.written {
                info!(path = %written.path.display(), "save_file_saved");
            }
            ExitCode::SUCCESS
        }
        Err(message) => {
            error!("{message}");
            ExitCode::from(1)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}
