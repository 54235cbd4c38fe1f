//! # Addressing Configuration
//!
//! The Modicon 20001-29999 band ("float" or extended registers) has no
//! function code fixed by the protocol. Devices differ: some serve it with
//! Read Holding Registers, others with Read Input Registers, and writes may
//! use Write Single Register, Write Multiple Registers, or both.
//!
//! [`AddressingConfig`] has no built-in choice for that band. Until
//! [`AddressingConfig::with_extended_band`] is called, resolving an address
//! in 20001-29999 fails with a configuration error.
//!
//! # Example
//!
//! ```rust
//! use voltage_modbus_ins::{AddressingConfig, ExtendedBand, ExtendedRead, ExtendedWrite};
//!
//! let config = AddressingConfig::new().with_extended_band(ExtendedBand {
//!     read: ExtendedRead::HoldingRegisters,
//!     write: ExtendedWrite::Auto,
//! });
//!
//! assert!(config.extended.is_some());
//! ```

use crate::protocol::ModbusFunction;

/// Read function used for the extended band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ExtendedRead {
    /// FC03
    HoldingRegisters,
    /// FC04
    InputRegisters,
}

/// Write function used for the extended band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ExtendedWrite {
    /// FC06 only; writes longer than one register are rejected.
    SingleRegister,
    /// FC16 for every length.
    MultipleRegisters,
    /// FC06 for a single register, FC16 otherwise.
    Auto,
}

/// Function-code choice for the vendor-dependent 20001-29999 band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtendedBand {
    pub read: ExtendedRead,
    pub write: ExtendedWrite,
}

impl ExtendedBand {
    pub fn read_function(&self) -> ModbusFunction {
        match self.read {
            ExtendedRead::HoldingRegisters => ModbusFunction::ReadHoldingRegisters,
            ExtendedRead::InputRegisters => ModbusFunction::ReadInputRegisters,
        }
    }

    /// Write function for a write of `length` registers.
    pub fn write_function(&self, length: u16) -> ModbusFunction {
        match self.write {
            ExtendedWrite::SingleRegister => ModbusFunction::WriteSingleRegister,
            ExtendedWrite::MultipleRegisters => ModbusFunction::WriteMultipleRegisters,
            ExtendedWrite::Auto if length == 1 => ModbusFunction::WriteSingleRegister,
            ExtendedWrite::Auto => ModbusFunction::WriteMultipleRegisters,
        }
    }
}

/// PLC-style addressing configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AddressingConfig {
    /// Function codes for the 20001-29999 band; `None` rejects that band.
    #[cfg_attr(feature = "serde", serde(default))]
    pub extended: Option<ExtendedBand>,
}

impl AddressingConfig {
    /// Configuration with the extended band left unconfigured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the function codes for the 20001-29999 band.
    pub fn with_extended_band(mut self, band: ExtendedBand) -> Self {
        self.extended = Some(band);
        self
    }
}
