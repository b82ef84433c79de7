//! linkgrab - CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use linkgrab::{
    cli::{run_command, run_interactive, Args, RunOutcome},
    config::{validate_config, Config},
    error::{exit_codes, Error, Result},
    output::{print_banner, print_error, print_info, print_warning},
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(outcome) => ExitCode::from(outcome.exit_code() as u8),
        Err(e) if e.is_cancelled() => {
            println!();
            print_info("Operation cancelled by user");
            ExitCode::from(exit_codes::SUCCESS as u8)
        }
        Err(e) => {
            print_error(&format!("{}", e));
            match e {
                Error::Config(_) | Error::ConfigValidation { .. } | Error::TomlParse(_) => {
                    ExitCode::from(exit_codes::CONFIG_ERROR as u8)
                }
                Error::Fetch { .. } | Error::UrlParse(_) => {
                    ExitCode::from(exit_codes::FETCH_ERROR as u8)
                }
                Error::Filesystem { .. } => ExitCode::from(exit_codes::DOWNLOAD_ERROR as u8),
                _ => ExitCode::from(exit_codes::UNEXPECTED_ERROR as u8),
            }
        }
    }
}

async fn run() -> Result<RunOutcome> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt().with_env_filter(filter).with_target(false).init();

    print_banner();

    let mut config = if args.config.exists() {
        Config::load(&args.config)?
    } else {
        if args.debug {
            print_warning(&format!(
                "Configuration file not found: {}",
                args.config.display()
            ));
            print_info("Using default configuration with CLI arguments");
        }
        Config::default()
    };
    args.merge_into_config(&mut config);
    validate_config(&config)?;

    if args.url.is_some() {
        run_command(&args, &config).await
    } else {
        run_interactive(&config, args.quiet).await
    }
}
