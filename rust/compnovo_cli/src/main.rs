mod cli;
mod config;
mod errors;
mod processing;

use clap::Parser;
use compnovo::CompNovo;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::Config;
use errors::CliError;

#[cfg(target_os = "windows")]
use mimalloc::MiMalloc;

#[cfg(target_os = "windows")]
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> std::result::Result<(), CliError> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        ) // This uses RUST_LOG environment variable
        .init();

    let args = Cli::parse();

    let conf = std::fs::File::open(&args.config).map_err(|e| CliError::io(e, &args.config))?;
    let mut config: Config = serde_json::from_reader(conf)
        .map_err(|e| CliError::ParseError { msg: e.to_string() })?;
    config.apply_cli_args(&args);

    let Some(input) = config.input.clone() else {
        return Err(CliError::Config {
            source: "No input provided, please provide one in either the config file or with the --spectra flag".to_string(),
        });
    };
    let Some(output) = config.output.clone() else {
        return Err(CliError::Config {
            source: "No output directory provided, please provide one in either the config file or with the --output-dir flag".to_string(),
        });
    };
    info!("Parsed configuration: {:#?}", config);

    std::fs::create_dir_all(&output.directory).map_err(|e| CliError::io(e, &output.directory))?;

    let engine = CompNovo::new(config.search)?;
    let records = processing::load_spectra(&input.spectra)?;
    info!(
        "Loaded {} spectra from {}",
        records.len(),
        input.spectra.display()
    );

    processing::main_loop(&engine, &records, &output)
}
