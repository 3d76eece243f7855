use thiserror::Error;

#[derive(Error, Debug)]
pub enum BottleError {
    #[error("Authentication failed for {user}@{host}")]
    AuthenticationFailed { user: String, host: String },

    #[error("Unknown operation: {name}")]
    UnknownOperation { name: String },

    #[error("Operation {operation} takes {expected} argument(s), got {got}")]
    WrongArity {
        operation: String,
        expected: usize,
        got: usize,
    },

    #[error("Scroll syntax error on line {line}: {message}")]
    ScrollSyntax { line: usize, message: String },

    #[error("Invalid password entry '{entry}', expected NAME=SECRET")]
    InvalidPasswordEntry { entry: String },

    #[error("Thread join error")]
    ThreadJoinError,
}
