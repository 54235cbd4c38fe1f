//! # Instruction Model
//!
//! Two ways to describe a Modbus operation:
//!
//! | Style | Type | Caller supplies |
//! |-------|------|-----------------|
//! | Normal | [`RequestIns`] | function code, zero-based start address, length |
//! | PLC | [`PlcRequestIns`] | read/write mode, Modicon address (e.g. 40101), length |
//!
//! Both are carried by [`Instruction`]. A PLC instruction is resolved into
//! a [`RequestIns`] by the [address resolver](crate::address) before any
//! PDU byte is produced, so the PDU builder only ever sees the normal form.
//!
//! Write operations carry a typed [`Payload`]:
//!
//! | Function | Payload |
//! |----------|---------|
//! | 0x05 | `Value(0xFF00)` or `Value(0x0000)` |
//! | 0x06 | `Value(v)` |
//! | 0x0F | `Coils(..)`, one entry per coil |
//! | 0x10 | `Registers(..)`, one entry per register |
//! | 0x16 | `Mask { and_mask, or_mask }` |
//! | 0x17 | `ReadWrite { write_address, values }` |

use crate::address::{self, RegisterSpace};
use crate::config::AddressingConfig;
use crate::constants::{COIL_OFF, COIL_ON, MAX_WRITE_REGISTERS};
use crate::error::{ModbusError, ModbusResult};
use crate::protocol::ModbusFunction;

/// Direction of a PLC-style instruction (`false` = read, `true` = write).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AccessMode {
    #[default]
    Read,
    Write,
}

impl AccessMode {
    pub fn is_write(self) -> bool {
        self == Self::Write
    }
}

impl From<bool> for AccessMode {
    fn from(write: bool) -> Self {
        if write {
            Self::Write
        } else {
            Self::Read
        }
    }
}

/// Data written by a write instruction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Payload {
    /// Read instructions carry nothing.
    #[default]
    None,
    /// Raw 16-bit value for FC05 and FC06.
    Value(u16),
    /// Coil states for FC15.
    Coils(Vec<bool>),
    /// Register values for FC16.
    Registers(Vec<u16>),
    /// Masks for FC22.
    Mask { and_mask: u16, or_mask: u16 },
    /// Write half of FC23; the read half is the instruction's address/length.
    ReadWrite { write_address: u16, values: Vec<u16> },
}

impl Payload {
    /// Payload for FC05.
    pub fn coil(on: bool) -> Self {
        Self::Value(if on { COIL_ON } else { COIL_OFF })
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Value(_) => "value",
            Self::Coils(_) => "coils",
            Self::Registers(_) => "registers",
            Self::Mask { .. } => "mask",
            Self::ReadWrite { .. } => "read/write",
        }
    }
}

/// Normal-style request: the caller states the function code directly.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RequestIns {
    /// Modbus function code.
    pub function_code: u16,
    /// Zero-based start address, 0-65535.
    pub start_addr: u16,
    /// Number of coils/registers.
    pub data_length: u16,
    /// Data for write functions.
    #[cfg_attr(feature = "serde", serde(default))]
    pub payload: Payload,
}

impl RequestIns {
    /// Request without payload (read functions).
    pub fn new(function: ModbusFunction, start_addr: u16, data_length: u16) -> Self {
        Self {
            function_code: function.to_u8().into(),
            start_addr,
            data_length,
            payload: Payload::None,
        }
    }

    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    pub fn read_coils(start_addr: u16, quantity: u16) -> Self {
        Self::new(ModbusFunction::ReadCoils, start_addr, quantity)
    }

    pub fn read_discrete_inputs(start_addr: u16, quantity: u16) -> Self {
        Self::new(ModbusFunction::ReadDiscreteInputs, start_addr, quantity)
    }

    pub fn read_holding_registers(start_addr: u16, quantity: u16) -> Self {
        Self::new(ModbusFunction::ReadHoldingRegisters, start_addr, quantity)
    }

    pub fn read_input_registers(start_addr: u16, quantity: u16) -> Self {
        Self::new(ModbusFunction::ReadInputRegisters, start_addr, quantity)
    }

    pub fn write_single_coil(address: u16, on: bool) -> Self {
        Self::new(ModbusFunction::WriteSingleCoil, address, 1).with_payload(Payload::coil(on))
    }

    pub fn write_single_register(address: u16, value: u16) -> Self {
        Self::new(ModbusFunction::WriteSingleRegister, address, 1)
            .with_payload(Payload::Value(value))
    }

    pub fn write_multiple_coils(start_addr: u16, values: &[bool]) -> Self {
        Self::new(
            ModbusFunction::WriteMultipleCoils,
            start_addr,
            values.len().min(u16::MAX as usize) as u16,
        )
        .with_payload(Payload::Coils(values.to_vec()))
    }

    pub fn write_multiple_registers(start_addr: u16, values: &[u16]) -> Self {
        Self::new(
            ModbusFunction::WriteMultipleRegisters,
            start_addr,
            values.len().min(u16::MAX as usize) as u16,
        )
        .with_payload(Payload::Registers(values.to_vec()))
    }

    pub fn mask_write_register(address: u16, and_mask: u16, or_mask: u16) -> Self {
        Self::new(ModbusFunction::MaskWriteRegister, address, 1)
            .with_payload(Payload::Mask { and_mask, or_mask })
    }

    pub fn read_write_multiple_registers(
        read_addr: u16,
        read_quantity: u16,
        write_addr: u16,
        values: &[u16],
    ) -> Self {
        Self::new(
            ModbusFunction::ReadWriteMultipleRegisters,
            read_addr,
            read_quantity,
        )
        .with_payload(Payload::ReadWrite {
            write_address: write_addr,
            values: values.to_vec(),
        })
    }

    pub fn read_fifo_queue(fifo_addr: u16) -> Self {
        Self::new(ModbusFunction::ReadFifoQueue, fifo_addr, 1)
    }

    /// True when [`check`](Self::check) would accept the request.
    pub fn validate(&self) -> bool {
        self.check().is_ok()
    }

    /// Validate the request and return its function.
    ///
    /// Checks the function code, the per-function length bound, and that
    /// the payload matches the function and length.
    pub fn check(&self) -> ModbusResult<ModbusFunction> {
        let function = ModbusFunction::from_u16(self.function_code)?;
        check_length(function, self.data_length)?;

        use ModbusFunction::*;
        match (function, &self.payload) {
            (ReadCoils | ReadDiscreteInputs | ReadHoldingRegisters | ReadInputRegisters, Payload::None)
            | (ReadFifoQueue, Payload::None)
            | (WriteSingleRegister, Payload::Value(_))
            | (MaskWriteRegister, Payload::Mask { .. }) => Ok(function),
            (WriteSingleCoil, Payload::Value(value)) => {
                if *value == COIL_ON || *value == COIL_OFF {
                    Ok(function)
                } else {
                    Err(ModbusError::InvalidValue {
                        function: function.to_u8(),
                        value: *value,
                    })
                }
            }
            (WriteMultipleCoils, Payload::Coils(values)) => {
                check_count(function, self.data_length, values.len())
            }
            (WriteMultipleRegisters, Payload::Registers(values)) => {
                check_count(function, self.data_length, values.len())
            }
            (ReadWriteMultipleRegisters, Payload::ReadWrite { values, .. }) => {
                if values.is_empty() || values.len() > MAX_WRITE_REGISTERS as usize {
                    Err(ModbusError::InvalidLength {
                        function: function.to_u8(),
                        length: values.len().min(u16::MAX as usize) as u16,
                        min: 1,
                        max: MAX_WRITE_REGISTERS,
                    })
                } else {
                    Ok(function)
                }
            }
            (function, payload) => Err(ModbusError::invalid_data(format!(
                "{} does not take a {} payload",
                function.name(),
                payload.kind()
            ))),
        }
    }
}

fn check_length(function: ModbusFunction, length: u16) -> ModbusResult<()> {
    let (min, max) = function.length_bounds();
    if length < min || length > max {
        return Err(ModbusError::InvalidLength {
            function: function.to_u8(),
            length,
            min,
            max,
        });
    }
    Ok(())
}

fn check_count(function: ModbusFunction, length: u16, count: usize) -> ModbusResult<ModbusFunction> {
    if count != length as usize {
        return Err(ModbusError::invalid_data(format!(
            "{} declares {} values but carries {}",
            function.name(),
            length,
            count
        )));
    }
    Ok(function)
}

/// PLC-style request: function code, width and direction are inferred from
/// a Modicon address and the access mode.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlcRequestIns {
    /// Read or write.
    pub mode: AccessMode,
    /// Modicon address, e.g. 40101 or 400101.
    pub data_addr: u32,
    /// Number of coils/registers.
    pub data_length: u16,
    /// Data for write instructions.
    #[cfg_attr(feature = "serde", serde(default))]
    pub payload: Payload,
}

impl PlcRequestIns {
    pub fn new(mode: impl Into<AccessMode>, data_addr: u32, data_length: u16) -> Self {
        Self {
            mode: mode.into(),
            data_addr,
            data_length,
            payload: Payload::None,
        }
    }

    pub fn read(data_addr: u32, data_length: u16) -> Self {
        Self::new(AccessMode::Read, data_addr, data_length)
    }

    pub fn write(data_addr: u32, payload: Payload) -> Self {
        let data_length = match &payload {
            Payload::Coils(values) => values.len(),
            Payload::Registers(values) => values.len(),
            _ => 1,
        };
        Self {
            mode: AccessMode::Write,
            data_addr,
            data_length: data_length.min(u16::MAX as usize) as u16,
            payload,
        }
    }

    /// Address lies in a recognized band and the length is within that
    /// band's bound for the requested mode.
    ///
    /// The extended band is accepted here regardless of configuration;
    /// its function codes are only chosen by [`to_request`](Self::to_request).
    pub fn validate(&self) -> bool {
        let Some(band) = address::band_for(self.data_addr) else {
            return false;
        };
        if self.mode.is_write() && band.space.is_read_only() {
            return false;
        }
        let (min, max) = band.space.length_bounds(self.mode);
        (min..=max).contains(&self.data_length)
    }

    /// Resolve into the equivalent normal-style request.
    ///
    /// The payload is normalized to the shape the resolved function expects:
    /// a single coil given as `Coils([b])` becomes `Value(0xFF00/0x0000)`,
    /// a single register given as `Registers([v])` becomes `Value(v)`, and
    /// `Value(v)` bound for FC16 becomes `Registers([v])`.
    pub fn to_request(&self, config: &AddressingConfig) -> ModbusResult<RequestIns> {
        let resolved = address::resolve(self.data_addr, self.mode, self.data_length, config)?;
        let payload = normalize_payload(resolved.function, resolved.space, &self.payload);
        let request = RequestIns::new(resolved.function, resolved.offset, self.data_length)
            .with_payload(payload);
        request.check()?;
        Ok(request)
    }
}

fn normalize_payload(function: ModbusFunction, space: RegisterSpace, payload: &Payload) -> Payload {
    match (function, payload) {
        (ModbusFunction::WriteSingleCoil, Payload::Coils(values)) if values.len() == 1 => {
            Payload::coil(values[0])
        }
        (ModbusFunction::WriteSingleCoil, Payload::Value(value))
            if space == RegisterSpace::Coil && *value == 1 =>
        {
            Payload::coil(true)
        }
        (ModbusFunction::WriteSingleRegister, Payload::Registers(values)) if values.len() == 1 => {
            Payload::Value(values[0])
        }
        (ModbusFunction::WriteMultipleRegisters, Payload::Value(value)) => {
            Payload::Registers(vec![*value])
        }
        _ => payload.clone(),
    }
}

/// Either addressing style; resolved to a [`RequestIns`] before building.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Instruction {
    Normal(RequestIns),
    Plc(PlcRequestIns),
}

impl Instruction {
    pub fn validate(&self) -> bool {
        match self {
            Self::Normal(request) => request.validate(),
            Self::Plc(request) => request.validate(),
        }
    }

    /// Canonical normal-style request for this instruction.
    pub fn into_request(self, config: &AddressingConfig) -> ModbusResult<RequestIns> {
        match self {
            Self::Normal(request) => {
                request.check()?;
                Ok(request)
            }
            Self::Plc(request) => request.to_request(config),
        }
    }
}

impl From<RequestIns> for Instruction {
    fn from(request: RequestIns) -> Self {
        Self::Normal(request)
    }
}

impl From<PlcRequestIns> for Instruction {
    fn from(request: PlcRequestIns) -> Self {
        Self::Plc(request)
    }
}
