use air_emissions::cli::{Args, init_logging};
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    // Parse command line arguments
    let args = Args::parse();
    init_logging(&args);

    let config = match args.to_config() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("Error: {:#}", error);
            return ExitCode::FAILURE;
        }
    };

    air_emissions::run(&args.input_files(), &config)
}
