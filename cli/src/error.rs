use rdfhash::LoadError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    InvalidOptions(LoadError),
    #[error("No graph loaded: {0}")]
    NoGraph(#[from] LoadError),
    #[error("Failed to write output: `{0}`")]
    Io(#[from] std::io::Error),
    #[error("Json serialization error: `{0}`")]
    SerdeJson(#[from] serde_json::Error),
}
