use clap::{
    Parser,
    ValueEnum,
};
use compnovo::FragmentationStrategy;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the JSON configuration file
    #[arg(short, long)]
    pub config: PathBuf,

    /// Path to the JSON spectra file (will over-write the config file)
    #[arg(short, long)]
    pub spectra: Option<PathBuf>,

    /// Path to the output directory
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Fragmentation chemistry used to read the spectra (will over-write the config file)
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum StrategyArg {
    Cid,
    Etd,
}

impl From<StrategyArg> for FragmentationStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Cid => FragmentationStrategy::Cid,
            StrategyArg::Etd => FragmentationStrategy::Etd,
        }
    }
}
