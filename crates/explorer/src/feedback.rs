/// A user-facing message on the shared notification channel.
///
/// Collaborator outcomes arrive here rather than in a controller, so the
/// front end decides how to present them (status bar, stderr, toast).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    /// Informational message (an operation finished).
    Info(String),
    /// Operation continued but something noteworthy occurred.
    Warning(String),
    /// A collaborator call failed.
    Error(String),
}

impl Feedback {
    pub fn info(msg: impl Into<String>) -> Self {
        Self::Info(msg.into())
    }

    pub fn warning(msg: impl Into<String>) -> Self {
        Self::Warning(msg.into())
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self::Error(msg.into())
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, Self::Warning(_))
    }

    pub fn is_info(&self) -> bool {
        matches!(self, Self::Info(_))
    }

    /// The message text without a severity prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Info(msg) | Self::Warning(msg) | Self::Error(msg) => msg,
        }
    }
}

impl std::fmt::Display for Feedback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info(msg) => write!(f, "{msg}"),
            Self::Warning(msg) => write!(f, "warning: {msg}"),
            Self::Error(msg) => write!(f, "error: {msg}"),
        }
    }
}
