/// Convenience result type used across layerdeck.
pub type DeckResult<T> = Result<T, DeckError>;

/// Top-level error taxonomy used by compiler APIs.
///
/// Every variant is fatal: nothing in the compiler retries, and a failed page aborts the whole
/// run so the output never ends up with fewer pages than bookmarks.
#[derive(thiserror::Error, Debug)]
pub enum DeckError {
    /// Invalid configuration, e.g. an output directory that cannot be created.
    #[error("configuration error: {0}")]
    Config(String),

    /// The source document's layer tree cannot be interpreted (missing label, bad XML).
    #[error("structure error: {0}")]
    Structure(String),

    /// The layer set is well-formed but cannot be compiled into a page sequence.
    #[error("validation error: {0}")]
    Validation(String),

    /// Rendering a single page failed.
    #[error("render error on page {page} ('{label}'): {message}")]
    Render {
        /// 1-based page number in the final output.
        page: u32,
        /// Label of the layer that triggered the page.
        label: String,
        /// Underlying failure description.
        message: String,
    },

    /// Merging the rendered pages into the final output failed.
    #[error("assembly error: {0}")]
    Assembly(String),

    /// Misuse of the write-once annotation stream.
    #[error("annotation error: {0}")]
    Annotation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DeckError {
    /// Build a [`DeckError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`DeckError::Structure`] value.
    pub fn structure(msg: impl Into<String>) -> Self {
        Self::Structure(msg.into())
    }

    /// Build a [`DeckError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`DeckError::Render`] value for the page at 0-based `index`.
    pub fn render(index: u32, label: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Render {
            page: index + 1,
            label: label.into(),
            message: msg.into(),
        }
    }

    /// Build a [`DeckError::Assembly`] value.
    pub fn assembly(msg: impl Into<String>) -> Self {
        Self::Assembly(msg.into())
    }

    /// Build a [`DeckError::Annotation`] value.
    pub fn annotation(msg: impl Into<String>) -> Self {
        Self::Annotation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
