//! Supported Modbus function codes

use std::fmt;

use crate::constants::*;
use crate::error::{ModbusError, ModbusResult};

/// Function codes this crate can build and parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModbusFunction {
    ReadCoils,
    ReadDiscreteInputs,
    ReadHoldingRegisters,
    ReadInputRegisters,
    WriteSingleCoil,
    WriteSingleRegister,
    WriteMultipleCoils,
    WriteMultipleRegisters,
    MaskWriteRegister,
    ReadWriteMultipleRegisters,
    ReadFifoQueue,
}

impl ModbusFunction {
    /// Every supported function, in function-code order.
    pub const ALL: [ModbusFunction; 11] = [
        Self::ReadCoils,
        Self::ReadDiscreteInputs,
        Self::ReadHoldingRegisters,
        Self::ReadInputRegisters,
        Self::WriteSingleCoil,
        Self::WriteSingleRegister,
        Self::WriteMultipleCoils,
        Self::WriteMultipleRegisters,
        Self::MaskWriteRegister,
        Self::ReadWriteMultipleRegisters,
        Self::ReadFifoQueue,
    ];

    pub fn from_u8(code: u8) -> ModbusResult<Self> {
        match code {
            FC_READ_COILS => Ok(Self::ReadCoils),
            FC_READ_DISCRETE_INPUTS => Ok(Self::ReadDiscreteInputs),
            FC_READ_HOLDING_REGISTERS => Ok(Self::ReadHoldingRegisters),
            FC_READ_INPUT_REGISTERS => Ok(Self::ReadInputRegisters),
            FC_WRITE_SINGLE_COIL => Ok(Self::WriteSingleCoil),
            FC_WRITE_SINGLE_REGISTER => Ok(Self::WriteSingleRegister),
            FC_WRITE_MULTIPLE_COILS => Ok(Self::WriteMultipleCoils),
            FC_WRITE_MULTIPLE_REGISTERS => Ok(Self::WriteMultipleRegisters),
            FC_MASK_WRITE_REGISTER => Ok(Self::MaskWriteRegister),
            FC_READ_WRITE_MULTIPLE_REGISTERS => Ok(Self::ReadWriteMultipleRegisters),
            FC_READ_FIFO_QUEUE => Ok(Self::ReadFifoQueue),
            _ => Err(ModbusError::invalid_function(code)),
        }
    }

    /// Accepts the wide `u16` function code field of a [`RequestIns`](crate::RequestIns).
    pub fn from_u16(code: u16) -> ModbusResult<Self> {
        u8::try_from(code)
            .map_err(|_| ModbusError::invalid_function(code))
            .and_then(Self::from_u8)
    }

    pub const fn to_u8(self) -> u8 {
        match self {
            Self::ReadCoils => FC_READ_COILS,
            Self::ReadDiscreteInputs => FC_READ_DISCRETE_INPUTS,
            Self::ReadHoldingRegisters => FC_READ_HOLDING_REGISTERS,
            Self::ReadInputRegisters => FC_READ_INPUT_REGISTERS,
            Self::WriteSingleCoil => FC_WRITE_SINGLE_COIL,
            Self::WriteSingleRegister => FC_WRITE_SINGLE_REGISTER,
            Self::WriteMultipleCoils => FC_WRITE_MULTIPLE_COILS,
            Self::WriteMultipleRegisters => FC_WRITE_MULTIPLE_REGISTERS,
            Self::MaskWriteRegister => FC_MASK_WRITE_REGISTER,
            Self::ReadWriteMultipleRegisters => FC_READ_WRITE_MULTIPLE_REGISTERS,
            Self::ReadFifoQueue => FC_READ_FIFO_QUEUE,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::ReadCoils => "Read Coils",
            Self::ReadDiscreteInputs => "Read Discrete Inputs",
            Self::ReadHoldingRegisters => "Read Holding Registers",
            Self::ReadInputRegisters => "Read Input Registers",
            Self::WriteSingleCoil => "Write Single Coil",
            Self::WriteSingleRegister => "Write Single Register",
            Self::WriteMultipleCoils => "Write Multiple Coils",
            Self::WriteMultipleRegisters => "Write Multiple Registers",
            Self::MaskWriteRegister => "Mask Write Register",
            Self::ReadWriteMultipleRegisters => "Read/Write Multiple Registers",
            Self::ReadFifoQueue => "Read FIFO Queue",
        }
    }

    /// Allowed `DataLength` range for this function.
    ///
    /// Single-unit functions (FC05, FC06, FC22) and FC24 take a fixed
    /// length of 1. For FC23 this is the read count; the write count is
    /// bounded separately by [`MAX_WRITE_REGISTERS`].
    pub const fn length_bounds(self) -> (u16, u16) {
        match self {
            Self::ReadCoils | Self::ReadDiscreteInputs => (1, MAX_READ_COILS),
            Self::ReadHoldingRegisters
            | Self::ReadInputRegisters
            | Self::ReadWriteMultipleRegisters => (1, MAX_READ_REGISTERS),
            Self::WriteMultipleCoils => (1, MAX_WRITE_COILS),
            Self::WriteMultipleRegisters => (1, MAX_WRITE_REGISTERS),
            Self::WriteSingleCoil
            | Self::WriteSingleRegister
            | Self::MaskWriteRegister
            | Self::ReadFifoQueue => (1, 1),
        }
    }

    /// Response carries a byte count followed by bit-packed values.
    pub const fn is_bit_read(self) -> bool {
        matches!(self, Self::ReadCoils | Self::ReadDiscreteInputs)
    }

    /// Response carries a byte count followed by big-endian registers.
    pub const fn is_register_read(self) -> bool {
        matches!(
            self,
            Self::ReadHoldingRegisters | Self::ReadInputRegisters | Self::ReadWriteMultipleRegisters
        )
    }

    /// Function modifies device state.
    pub const fn is_write(self) -> bool {
        matches!(
            self,
            Self::WriteSingleCoil
                | Self::WriteSingleRegister
                | Self::WriteMultipleCoils
                | Self::WriteMultipleRegisters
                | Self::MaskWriteRegister
                | Self::ReadWriteMultipleRegisters
        )
    }
}

impl fmt::Display for ModbusFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:02X})", self.name(), self.to_u8())
    }
}

impl TryFrom<u8> for ModbusFunction {
    type Error = ModbusError;

    fn try_from(code: u8) -> ModbusResult<Self> {
        Self::from_u8(code)
    }
}

impl From<ModbusFunction> for u8 {
    fn from(function: ModbusFunction) -> u8 {
        function.to_u8()
    }
}
