use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DefError {
    #[error("line {line}: entry has no token name")]
    MissingName { line: usize },
    #[error("line {line}: token `{name}` has no spelling")]
    MissingSpelling { line: usize, name: String },
    #[error("line {line}: `{spelling}` needs an explicit token name (`name: {spelling}`)")]
    BareSymbol { line: usize, spelling: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("token `{0}` has an empty spelling")]
    EmptySpelling(String),
    #[error("`{0}` is not a valid token identifier")]
    InvalidTokenName(String),
    #[error("token `{0}` is declared more than once")]
    DuplicateTokenName(String),
    #[error("spelling `{spelling}` is used by both `{first}` and `{second}`")]
    DuplicateSpelling {
        spelling: String,
        first: String,
        second: String,
    },
    #[error("symbol `{token}` is spelled `{spelling}`, symbols are at most two characters")]
    SymbolTooLong { token: String, spelling: String },
    #[error("token `{token}` uses unsupported character {character:?}")]
    UnsupportedCharacter { token: String, character: char },
}

#[derive(Debug, Error)]
pub enum GenError {
    #[error("invalid token tables")]
    Config(#[from] ConfigError),
    #[error("failed to parse {path}")]
    Def {
        path: PathBuf,
        #[source]
        source: DefError,
    },
    #[error("I/O error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("output directory {0} is the template directory, refusing to overwrite templates")]
    OutputIsTemplateDir(PathBuf),
}

impl GenError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> GenError {
        let path = path.into();
        move |source| GenError::Io { path, source }
    }
}
