//! Result and Error types for ecltools-io

/// Type alias for Result<T, io::Error>
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `ecltools-io` crate
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed input/output stream")]
    IOError(#[from] std::io::Error),

    #[error("array \"{0}\" not found")]
    NotFound(String),

    #[error("array \"{name}\" holds {found} data, requested {requested}")]
    WrongType {
        name: String,
        found: String,
        requested: &'static str,
    },

    #[error("array index {index} out of range, file holds {count} arrays")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("array \"{name}\" at byte {offset}: tail not matching header ({head} vs {tail})")]
    TailMismatch {
        name: String,
        offset: u64,
        head: i32,
        tail: i32,
    },

    #[error("array \"{name}\" at byte {offset}: {reason}")]
    Malformed {
        name: String,
        offset: u64,
        reason: String,
    },

    #[error("array \"{name}\" at byte {offset}: unexpected end of file")]
    UnexpectedEof { name: String, offset: u64 },

    #[error("unknown array type code \"{0}\"")]
    UnknownType(String),

    #[error("array \"{name}\": failed to parse formatted payload")]
    Parse { name: String },

    #[error("array name \"{0}\" exceeds eight characters")]
    NameTooLong(String),
}
