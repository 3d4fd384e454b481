use thiserror::Error;

/// Problems found while building the content model.
///
/// The content tree is trusted static configuration, so every variant is
/// fatal at startup.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to parse content document: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("content document defines no topics")]
    NoTopics,

    #[error("topic #{index} has an empty identifier")]
    EmptyTopicId { index: usize },

    #[error("duplicate topic identifier: {0}")]
    DuplicateTopicId(String),

    #[error("topic `{topic}` item #{index} is malformed: {reason}")]
    MalformedItem {
        topic: String,
        index: usize,
        reason: &'static str,
    },
}

/// Failure reported by a chart backend while constructing a chart.
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("chart backend rejected `{mount}`: {reason}")]
    Backend { mount: String, reason: String },

    #[error("chart spec has {labels} labels but {values} values")]
    LengthMismatch { labels: usize, values: usize },
}

/// Type alias for Results using ContentError
pub type Result<T> = std::result::Result<T, ContentError>;
