use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while fetching imported style sheets.
#[derive(Error, Debug)]
pub enum StyleError {
    #[error("failed to read style sheet {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid style sheet url: {0}")]
    Url(#[from] url::ParseError),

    #[error("unsupported url scheme `{0}`")]
    UnsupportedScheme(String),

    #[error("import nesting deeper than {0}")]
    ImportTooDeep(usize),
}
