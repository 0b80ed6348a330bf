//! Application error type.
//!
//! Every fallible step maps its failure into an [`AppError`] at the call site.
//! The error carries the process exit code, so `main` stays a one-liner.

/// Missing credential or invalid command-line input.
pub const EXIT_CONFIG: u8 = 2;
/// Response body was not valid JSON.
pub const EXIT_RESPONSE: u8 = 3;
/// Network failure or non-success HTTP status.
pub const EXIT_TRANSPORT: u8 = 4;
/// SQLite open/schema/insert/query failure.
pub const EXIT_STORAGE: u8 = 5;

#[derive(Clone, PartialEq, Eq)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(EXIT_CONFIG, message)
    }

    pub fn response(message: impl Into<String>) -> Self {
        Self::new(EXIT_RESPONSE, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(EXIT_TRANSPORT, message)
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(EXIT_STORAGE, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
