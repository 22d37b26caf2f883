#[derive(Debug)]
pub enum CliError {
    Config { source: String },
    ParseError { msg: String },
    Io { source: String, path: Option<String> },
    Search { source: String },
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Config { source } => write!(f, "Error interpreting the config: {}", source),
            CliError::ParseError { msg } => write!(f, "Error parsing input: {}", msg),
            CliError::Io { source, path } => {
                if let Some(path) = path {
                    write!(f, "Error accessing file {}: {}", path, source)
                } else {
                    write!(f, "Error accessing file: {}", source)
                }
            }
            CliError::Search { source } => write!(f, "Error setting up the search: {}", source),
        }
    }
}

impl std::error::Error for CliError {}

impl From<compnovo::CompNovoError> for CliError {
    fn from(e: compnovo::CompNovoError) -> Self {
        CliError::Search {
            source: e.to_string(),
        }
    }
}

impl CliError {
    pub fn io(e: std::io::Error, path: &std::path::Path) -> Self {
        CliError::Io {
            source: e.to_string(),
            path: Some(path.to_string_lossy().to_string()),
        }
    }
}
