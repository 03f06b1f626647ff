/// Failure categories for the analytics pipeline.
///
/// The kind determines the process exit code:
///
/// - input problems (I/O, malformed rows) exit 2
/// - datasets too small/empty for the requested analysis exit 3
/// - derived metrics that would divide by zero exit 4
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    Parse,
    EmptyDataset,
    InsufficientData,
    UndefinedGrowth,
    UndefinedPrice,
}

impl ErrorKind {
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::Io | ErrorKind::Parse => 2,
            ErrorKind::EmptyDataset | ErrorKind::InsufficientData => 3,
            ErrorKind::UndefinedGrowth | ErrorKind::UndefinedPrice => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    kind: ErrorKind,
    message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn exit_code(&self) -> u8 {
        self.kind.exit_code()
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
            .field("kind", &self.kind)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
