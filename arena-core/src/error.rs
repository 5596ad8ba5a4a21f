use thiserror::Error;

/// Failures at the host boundary. The unit core itself never errors.
#[derive(Debug, Error)]
pub enum ArenaError {
    #[error("failed to parse config: {0}")]
    ConfigParse(#[source] serde_json::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("unknown unit archetype: {0}")]
    UnknownArchetype(String),

    #[error("failed to serialize {what}: {source}")]
    Serialize {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
