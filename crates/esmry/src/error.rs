//! Result and Error types for ecltools-esmry

use std::path::PathBuf;

/// Type alias for Result<T, esmry::Error>
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `ecltools-esmry` crate
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed input/output stream")]
    IOError(#[from] std::io::Error),

    #[error("record file error")]
    EclFile(#[from] ecltools_io::Error),

    #[error("keyword {0} not found")]
    KeywordNotFound(String),

    #[error("vector {0} has not been loaded yet")]
    NotLoaded(String),

    #[error("input file should have extension .SMSPEC or .FSMSPEC")]
    WrongExtension,

    #[error("path to restart file not found, '{0}'")]
    RestartPathNotFound(PathBuf),

    #[error("restart chain revisits {0}")]
    RestartLoop(PathBuf),

    #[error("neither unified nor non-unified result files found for root {0}")]
    NoResultFiles(PathBuf),

    #[error("reading summary file {file}, expecting keyword {expected}, found \"{found}\"")]
    UnexpectedRecord {
        file: PathBuf,
        expected: &'static str,
        found: String,
    },

    #[error("unknown array \"{name}\" in summary data file {file}")]
    UnknownStepRecord { file: PathBuf, name: String },

    #[error("missing {name} array in {file}")]
    MissingRecord { file: PathBuf, name: &'static str },

    #[error("malformed {name} array in {file}")]
    MalformedRecord { file: PathBuf, name: &'static str },

    #[error("need lgr info element for making L type vector strings")]
    MissingLgrInfo,

    #[error("invalid STARTDAT content")]
    InvalidStartDate,

    #[error("report step {step} outside valid range 1 .. {count}")]
    ReportStepOutOfRange { step: usize, count: usize },

    #[error("creating an ESMRY file is only possible for a single run")]
    EsmryRequiresSingleRun,

    #[error("error reading binary data, inconsistent block framing in {file}")]
    BadParamsBlock { file: PathBuf },

    #[error("unreadable MINISTEP value in {file}")]
    BadMiniStep { file: PathBuf },
}
