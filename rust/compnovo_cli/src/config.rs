use compnovo::SearchConfig;
use serde::{
    Deserialize,
    Serialize,
};
use std::path::PathBuf;

use crate::cli::Cli;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    pub input: Option<InputConfig>,
    #[serde(default)]
    pub search: SearchConfig,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct InputConfig {
    pub spectra: PathBuf,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OutputConfig {
    pub directory: PathBuf,
}

impl Config {
    /// Command line arguments take precedence over the file.
    pub fn apply_cli_args(&mut self, args: &Cli) {
        if let Some(spectra) = &args.spectra {
            self.input = Some(InputConfig {
                spectra: spectra.clone(),
            });
        }
        if let Some(output_dir) = &args.output_dir {
            self.output = Some(OutputConfig {
                directory: output_dir.clone(),
            });
        }
        if let Some(strategy) = args.strategy {
            self.search.ion_scoring_strategy = strategy.into();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::StrategyArg;
    use compnovo::FragmentationStrategy;

    #[test]
    fn test_cli_overrides_file() {
        let mut config: Config = serde_json::from_str(
            r#"{
                "input": {"spectra": "in.json"},
                "search": {"ion_scoring_strategy": "cid", "top_k_permutations": 3}
            }"#,
        )
        .unwrap();
        assert_eq!(config.search.top_k_permutations, 3);
        assert!(config.output.is_none());

        let args = Cli {
            config: PathBuf::from("config.json"),
            spectra: Some(PathBuf::from("other.json")),
            output_dir: Some(PathBuf::from("out")),
            strategy: Some(StrategyArg::Etd),
        };
        config.apply_cli_args(&args);
        assert_eq!(config.input.unwrap().spectra, PathBuf::from("other.json"));
        assert_eq!(config.output.unwrap().directory, PathBuf::from("out"));
        assert_eq!(config.search.ion_scoring_strategy, FragmentationStrategy::Etd);
        assert_eq!(config.search.top_k_permutations, 3);
    }
}
