use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A pager reader was requested from a scope no pager has provided.
    #[error("pager state requested outside of a pager provider scope")]
    MissingProvider,

    /// A page index was requested from a scope that is not inside a page.
    #[error("page index requested outside of an index provider scope")]
    MissingIndex,

    #[error("failed to read config at {path:?}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
