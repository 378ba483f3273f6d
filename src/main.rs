use std::process::ExitCode;

use clap::Parser;
use precis::cli::{run, Args};
use precis::error::AppError;

fn main() -> ExitCode
{
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    match run(&args)
    {
        Ok(output) =>
        {
            print!("{output}\n");
            ExitCode::SUCCESS
        }
        Err(err) =>
        {
            print_user_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn print_user_error(err: &AppError)
{
    eprintln!("error: {err}");
}

fn init_logging(
    verbose: u8,
    quiet: bool,
)
{
    use tracing_subscriber::EnvFilter;

    let default_directive = if quiet
    {
        "error"
    }
    else
    {
        match verbose
        {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}
