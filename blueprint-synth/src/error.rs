use std::path::PathBuf;

/// Errors raised while turning a snapshot into playbooks
#[derive(Debug, thiserror::Error)]
pub enum SynthError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid snapshot {path}: {source}")]
    Snapshot {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to render playbook: {0}")]
    Render(#[from] serde_yaml::Error),
    #[error("hostname {0:?} cannot be used as a playbook file name")]
    InvalidHostname(String),
    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SynthError>;
