use thiserror::Error;

/// All failure kinds produced by the parser, rewriter, adapters, and driver.
#[derive(Error, Debug)]
pub enum OstrichError {
    #[error("{name} is must need argument")]
    ArgMissing { name: &'static str },

    #[error("error: {underlying}. command: {command}, args: {args}")]
    VcsError {
        command: String,
        args: String,
        underlying: String,
    },

    #[error("invalid commit texts. text line count is {0}")]
    DiffTooShort(usize),

    #[error("malformed commit header: {0}")]
    MalformedHeader(String),

    #[error("can not detect diff heading")]
    NoDiffHeader,

    #[error("can not detect hunk heading in file block")]
    NoHunkHeader,

    #[error("invalid hunk header: {0}")]
    BadHunkHeader(String),

    #[error("can not detect date: {0}")]
    BadDate(String),

    #[error("invalid file ext {0}")]
    UnsupportedExtension(String),

    #[error("filesystem error on {path}: {underlying}")]
    FilesystemError { path: String, underlying: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}
