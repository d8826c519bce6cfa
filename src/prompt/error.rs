use thiserror::Error;

#[derive(Debug, Error)]
/// Errors reading prompt assets. Never surfaced to callers: the store falls back.
pub enum TemplateError {
    #[error("prompt asset not found: {name}")]
    Missing { name: String },

    #[error("failed to read prompt asset {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience result type for template sources.
pub type TemplateResult<T> = Result<T, TemplateError>;
