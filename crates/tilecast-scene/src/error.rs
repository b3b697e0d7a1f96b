#![forbid(unsafe_code)]

use std::fmt;
use std::io;

use tilecast_proto::ProtoError;

/// Errors from writing to or reading from the broadcast channel.
#[derive(Debug)]
pub enum BroadcastError {
    /// The underlying writer failed.
    Io(io::Error),
    /// An envelope could not be encoded or an inbound line was malformed.
    Proto(ProtoError),
}

impl fmt::Display for BroadcastError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "broadcast I/O error: {err}"),
            Self::Proto(err) => write!(f, "broadcast protocol error: {err}"),
        }
    }
}

impl std::error::Error for BroadcastError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Proto(err) => Some(err),
        }
    }
}

impl From<io::Error> for BroadcastError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<ProtoError> for BroadcastError {
    fn from(err: ProtoError) -> Self {
        Self::Proto(err)
    }
}
