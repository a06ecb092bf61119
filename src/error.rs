//! Error kinds of a generation run.
//!
//! Only [`LoadError`] escapes a run; [`RenderError`] is counted per type.

use std::path::PathBuf;

/// The library or its documentation could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid metadata manifest {}", path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid documentation file {}", path.display())]
    Documentation {
        path: PathBuf,
        #[source]
        source: XmlDocError,
    },
}

/// Malformed XML documentation.
#[derive(Debug, thiserror::Error)]
pub enum XmlDocError {
    #[error("XML parse error")]
    Xml(#[from] quick_xml::Error),

    #[error("encoding error")]
    Encoding(#[from] quick_xml::encoding::EncodingError),

    #[error("unexpected end of file inside an element")]
    Truncated,
}

/// One type's page could not be produced.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to read example {}", path.display())]
    Example {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid examples pattern")]
    ExamplePattern(#[from] glob::PatternError),

    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} has no page")]
    MissingPage(String),
}
