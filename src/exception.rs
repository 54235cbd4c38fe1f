//! Modbus exception codes
//!
//! A device rejects a request by answering with `function_code | 0x80`
//! followed by a single exception-code byte. [`decode_exception`] turns that
//! pair into a [`ModbusError::Exception`] and never fails: bytes outside the
//! known set decode to [`ModbusException::Unknown`].

use std::fmt;

use crate::constants::*;
use crate::error::ModbusError;

/// Exception code returned by a remote device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModbusException {
    IllegalFunction,
    IllegalDataAddress,
    IllegalDataValue,
    ServerDeviceFailure,
    Acknowledge,
    ServerDeviceBusy,
    MemoryParityError,
    GatewayPathUnavailable,
    GatewayTargetFailedToRespond,
    /// Any byte outside the codes defined by the protocol.
    Unknown(u8),
}

impl ModbusException {
    /// Classify a raw exception byte.
    pub const fn from_u8(code: u8) -> Self {
        match code {
            EXCEPTION_ILLEGAL_FUNCTION => Self::IllegalFunction,
            EXCEPTION_ILLEGAL_DATA_ADDRESS => Self::IllegalDataAddress,
            EXCEPTION_ILLEGAL_DATA_VALUE => Self::IllegalDataValue,
            EXCEPTION_SERVER_DEVICE_FAILURE => Self::ServerDeviceFailure,
            EXCEPTION_ACKNOWLEDGE => Self::Acknowledge,
            EXCEPTION_SERVER_DEVICE_BUSY => Self::ServerDeviceBusy,
            EXCEPTION_MEMORY_PARITY_ERROR => Self::MemoryParityError,
            EXCEPTION_GATEWAY_PATH_UNAVAILABLE => Self::GatewayPathUnavailable,
            EXCEPTION_GATEWAY_TARGET_FAILED => Self::GatewayTargetFailedToRespond,
            other => Self::Unknown(other),
        }
    }

    /// Raw exception byte.
    pub const fn to_u8(self) -> u8 {
        match self {
            Self::IllegalFunction => EXCEPTION_ILLEGAL_FUNCTION,
            Self::IllegalDataAddress => EXCEPTION_ILLEGAL_DATA_ADDRESS,
            Self::IllegalDataValue => EXCEPTION_ILLEGAL_DATA_VALUE,
            Self::ServerDeviceFailure => EXCEPTION_SERVER_DEVICE_FAILURE,
            Self::Acknowledge => EXCEPTION_ACKNOWLEDGE,
            Self::ServerDeviceBusy => EXCEPTION_SERVER_DEVICE_BUSY,
            Self::MemoryParityError => EXCEPTION_MEMORY_PARITY_ERROR,
            Self::GatewayPathUnavailable => EXCEPTION_GATEWAY_PATH_UNAVAILABLE,
            Self::GatewayTargetFailedToRespond => EXCEPTION_GATEWAY_TARGET_FAILED,
            Self::Unknown(code) => code,
        }
    }

    /// Human-readable name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::IllegalFunction => "illegal function",
            Self::IllegalDataAddress => "illegal data address",
            Self::IllegalDataValue => "illegal data value",
            Self::ServerDeviceFailure => "server device failure",
            Self::Acknowledge => "acknowledge",
            Self::ServerDeviceBusy => "server device busy",
            Self::MemoryParityError => "memory parity error",
            Self::GatewayPathUnavailable => "gateway path unavailable",
            Self::GatewayTargetFailedToRespond => "gateway target device failed to respond",
            Self::Unknown(_) => "unknown",
        }
    }

    /// The device accepted the request but the caller should poll again
    /// later (Acknowledge or Server Device Busy).
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::Acknowledge | Self::ServerDeviceBusy)
    }
}

impl fmt::Display for ModbusException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<u8> for ModbusException {
    fn from(code: u8) -> Self {
        Self::from_u8(code)
    }
}

/// Build the protocol exception error for a request function code and the
/// exception byte that followed the flagged function code in the response.
pub fn decode_exception(function_code: u8, exception_code: u8) -> ModbusError {
    ModbusError::Exception {
        function: function_code & !EXCEPTION_FLAG,
        exception: ModbusException::from_u8(exception_code),
    }
}
