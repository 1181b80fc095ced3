//! Error taxonomy for the diff core.
//!
//! Modeled after NSD's ixfr.c failure modes: every fallible operation in this
//! crate collapses to one of a handful of kinds, logged once at the point of
//! detection and then propagated all the way up to the orchestrator. Nothing
//! here is recovered internally - a diff session either completes or it
//! doesn't.

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Any read/write/open failure against the spool file or zone file.
    Io,
    /// The spool header's apex or old serial did not match the diff session.
    StaleSnapshot,
    /// A dname longer than 255 octets, a short read mid-record, or an rdlen
    /// over 65535 was encountered while reading the spool.
    MalformedSpool,
    /// Allocation failure while building a diff operation or store entry.
    Oom,
    /// The YAML configuration file could not be parsed.
    Config,
}

impl Error {
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Io,
            message: Some(message.into()),
        }
    }

    pub fn is_stale_snapshot(&self) -> bool {
        self.kind == ErrorKind::StaleSnapshot
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {}", self.kind, message),
            None => self.kind.fmt(f),
        }
    }
}

impl std::error::Error for Error {}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use ErrorKind::*;

        match self {
            Io => write!(f, "io error"),
            StaleSnapshot => write!(f, "stale snapshot"),
            MalformedSpool => write!(f, "malformed spool"),
            Oom => write!(f, "out of memory"),
            Config => write!(f, "configuration error"),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self {
            kind: ErrorKind::Io,
            message: Some(value.to_string()),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(value: serde_yaml::Error) -> Self {
        Self {
            kind: ErrorKind::Config,
            message: Some(value.to_string()),
        }
    }
}

/// Builds an [`Error`] with a formatted message:
/// `error!(StaleSnapshot => "serial {} != {}", a, b)`.
macro_rules! error {
    ($kind:ident => $($arg:tt)*) => {
        $crate::error::Error {
            kind: $crate::error::ErrorKind::$kind,
            message: Some(format!($($arg)*)),
        }
    };
}

pub(crate) use error;
