//! Error types
//!
//! Every failure carries enough detail to tell apart the four classes
//! reported by [`ModbusError::kind`]: local validation, remote protocol
//! exception, malformed response, and transport failure.

use std::time::Duration;

use thiserror::Error;

use crate::exception::ModbusException;

/// Result alias used across the crate.
pub type ModbusResult<T> = Result<T, ModbusError>;

/// Boxed error raised by a [`Packager`](crate::transport::Packager) or
/// [`Transporter`](crate::transport::Transporter) implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Coarse classification of a [`ModbusError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Rejected locally before anything reached the wire.
    Validation,
    /// The remote device answered with an exception response.
    Exception,
    /// The response PDU does not correspond to the request.
    MalformedResponse,
    /// Framing or transport failure reported by a collaborator.
    Transport,
}

/// Modbus access layer error.
#[derive(Debug, Error)]
pub enum ModbusError {
    #[error("Invalid function code: 0x{code:02X}")]
    InvalidFunction { code: u16 },

    #[error("Address out of range: {address}")]
    AddressOutOfRange { address: u32 },

    #[error("Invalid length {length} for function 0x{function:02X} (allowed {min}-{max})")]
    InvalidLength {
        function: u8,
        length: u16,
        min: u16,
        max: u16,
    },

    #[error("Address {address} is in a read-only space ({space})")]
    ReadOnlySpace { address: u32, space: &'static str },

    #[error("Invalid value 0x{value:04X} for function 0x{function:02X}")]
    InvalidValue { function: u8, value: u16 },

    #[error("Invalid data: {message}")]
    InvalidData { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Modbus exception 0x{:02X} ({exception}), function 0x{function:02X}", .exception.to_u8())]
    Exception {
        function: u8,
        exception: ModbusException,
    },

    #[error("Function code mismatch: expected 0x{expected:02X}, got 0x{actual:02X}")]
    FunctionMismatch { expected: u8, actual: u8 },

    #[error("Byte count mismatch: expected {expected}, got {actual}")]
    ByteCountMismatch { expected: usize, actual: usize },

    #[error("Protocol error: {message}")]
    Protocol { message: String },

    #[error("Transport error: {0}")]
    Transport(#[source] BoxError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Timeout after {timeout:?} during {operation}")]
    Timeout {
        operation: String,
        timeout: Duration,
    },
}

impl ModbusError {
    pub fn invalid_function(code: impl Into<u16>) -> Self {
        Self::InvalidFunction { code: code.into() }
    }

    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Wrap a collaborator error without altering it.
    pub fn transport<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::Transport(err.into())
    }

    pub fn timeout(operation: impl Into<String>, timeout: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout,
        }
    }

    /// Which of the four error classes this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidFunction { .. }
            | Self::AddressOutOfRange { .. }
            | Self::InvalidLength { .. }
            | Self::ReadOnlySpace { .. }
            | Self::InvalidValue { .. }
            | Self::InvalidData { .. }
            | Self::Configuration { .. } => ErrorKind::Validation,
            Self::Exception { .. } => ErrorKind::Exception,
            Self::FunctionMismatch { .. }
            | Self::ByteCountMismatch { .. }
            | Self::Protocol { .. } => ErrorKind::MalformedResponse,
            Self::Transport(_) | Self::Io(_) | Self::Timeout { .. } => ErrorKind::Transport,
        }
    }

    /// Exception code carried by a protocol exception, if any.
    pub fn exception(&self) -> Option<ModbusException> {
        match self {
            Self::Exception { exception, .. } => Some(*exception),
            _ => None,
        }
    }

    /// True only for Acknowledge (5) and Server Device Busy (6) exceptions.
    ///
    /// Every other failure is final for the exchange as far as this crate is
    /// concerned; transport retries belong to the caller.
    pub fn is_retryable(&self) -> bool {
        self.exception().is_some_and(ModbusException::is_retryable)
    }
}

impl From<ModbusError> for std::io::Error {
    fn from(err: ModbusError) -> Self {
        match err {
            ModbusError::Io(io) => io,
            other => std::io::Error::other(other),
        }
    }
}
