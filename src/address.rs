//! # PLC-Style Address Resolution
//!
//! Maps a Modicon address onto a Modbus register space, a concrete
//! function code, and a zero-based offset within that space.
//!
//! | Address band | Space | Read | Write (1) | Write (>1) | Length |
//! |--------------|-------|------|-----------|------------|--------|
//! | 1-9999 | coil | 0x01 | 0x05 | 0x0F | 1-2000 |
//! | 10001-19999 | discrete input | 0x02 | read-only | read-only | 1-2000 |
//! | 20001-29999 | extended | configured | configured | configured | 1-125 read / 1-120 write |
//! | 30001-39999 | input register | 0x04 | read-only | read-only | 1-125 |
//! | 40001-49999 | holding register | 0x03 | 0x06 | 0x10 | 1-125 read / 1-120 write |
//! | 400001-465535 | holding register | 0x03 | 0x06 | 0x10 | 1-125 read / 1-120 write |
//!
//! Each band follows the Modicon numbering convention: its first address is
//! offset 0, so the offset is `address - first` where `first` is 1, 10001,
//! 20001, 30001, 40001 or 400001. Addresses outside every band are rejected,
//! never clamped.
//!
//! ```rust
//! use voltage_modbus_ins::{address, AccessMode, AddressingConfig, ModbusFunction};
//!
//! let resolved = address::resolve(40101, AccessMode::Read, 2, &AddressingConfig::new()).unwrap();
//! assert_eq!(resolved.function, ModbusFunction::ReadHoldingRegisters);
//! assert_eq!(resolved.offset, 100);
//! ```

use std::fmt;

use tracing::debug;

use crate::config::AddressingConfig;
use crate::constants::*;
use crate::error::{ModbusError, ModbusResult};
use crate::instruction::AccessMode;
use crate::protocol::ModbusFunction;

/// Modbus data space addressed by a Modicon band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegisterSpace {
    Coil,
    DiscreteInput,
    HoldingRegister,
    InputRegister,
    /// Vendor-dependent 20001-29999 band.
    Extended,
}

impl RegisterSpace {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Coil => "coil",
            Self::DiscreteInput => "discrete input",
            Self::HoldingRegister => "holding register",
            Self::InputRegister => "input register",
            Self::Extended => "extended register",
        }
    }

    pub const fn is_read_only(self) -> bool {
        matches!(self, Self::DiscreteInput | Self::InputRegister)
    }

    /// Inclusive length bound for the given access mode.
    pub const fn length_bounds(self, mode: AccessMode) -> (u16, u16) {
        match (self, mode) {
            (Self::Coil, AccessMode::Read) | (Self::DiscreteInput, _) => (1, MAX_READ_COILS),
            (Self::Coil, AccessMode::Write) => (1, MAX_WRITE_COILS),
            (Self::HoldingRegister | Self::Extended, AccessMode::Write) => {
                (1, MAX_WRITE_REGISTERS)
            }
            (Self::HoldingRegister | Self::Extended, AccessMode::Read) | (Self::InputRegister, _) => {
                (1, MAX_READ_REGISTERS)
            }
        }
    }
}

impl fmt::Display for RegisterSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One contiguous Modicon address band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressBand {
    pub space: RegisterSpace,
    /// Address of offset 0.
    pub first: u32,
    pub last: u32,
}

impl AddressBand {
    pub const fn contains(&self, address: u32) -> bool {
        address >= self.first && address <= self.last
    }

    /// Zero-based offset of `address` within the band.
    pub fn offset(&self, address: u32) -> Option<u16> {
        if !self.contains(address) {
            return None;
        }
        u16::try_from(address - self.first).ok()
    }
}

/// Recognized bands, ordered by address.
pub const BANDS: [AddressBand; 6] = [
    AddressBand {
        space: RegisterSpace::Coil,
        first: COIL_FIRST,
        last: COIL_LAST,
    },
    AddressBand {
        space: RegisterSpace::DiscreteInput,
        first: DISCRETE_INPUT_FIRST,
        last: DISCRETE_INPUT_LAST,
    },
    AddressBand {
        space: RegisterSpace::Extended,
        first: EXTENDED_FIRST,
        last: EXTENDED_LAST,
    },
    AddressBand {
        space: RegisterSpace::InputRegister,
        first: INPUT_REGISTER_FIRST,
        last: INPUT_REGISTER_LAST,
    },
    AddressBand {
        space: RegisterSpace::HoldingRegister,
        first: HOLDING_REGISTER_FIRST,
        last: HOLDING_REGISTER_LAST,
    },
    AddressBand {
        space: RegisterSpace::HoldingRegister,
        first: HOLDING_REGISTER_WIDE_FIRST,
        last: HOLDING_REGISTER_WIDE_LAST,
    },
];

/// Band containing `address`, if any.
pub fn band_for(address: u32) -> Option<&'static AddressBand> {
    BANDS.iter().find(|band| band.contains(address))
}

/// Outcome of resolving a Modicon address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedAddress {
    pub function: ModbusFunction,
    pub space: RegisterSpace,
    /// Zero-based offset within `space`.
    pub offset: u16,
}

/// Resolve a Modicon address, access mode and length.
///
/// # Errors
///
/// - [`ModbusError::AddressOutOfRange`] if `address` is in no band
/// - [`ModbusError::ReadOnlySpace`] for writes to discrete inputs or input registers
/// - [`ModbusError::Configuration`] for the extended band without an [`ExtendedBand`](crate::ExtendedBand)
/// - [`ModbusError::InvalidLength`] if `length` exceeds the band bound for `mode`
pub fn resolve(
    address: u32,
    mode: AccessMode,
    length: u16,
    config: &AddressingConfig,
) -> ModbusResult<ResolvedAddress> {
    let band = band_for(address).ok_or(ModbusError::AddressOutOfRange { address })?;

    if mode.is_write() && band.space.is_read_only() {
        return Err(ModbusError::ReadOnlySpace {
            address,
            space: band.space.name(),
        });
    }

    let function = select_function(band.space, mode, length, config)?;

    let (mut min, mut max) = band.space.length_bounds(mode);
    if matches!(
        function,
        ModbusFunction::WriteSingleCoil | ModbusFunction::WriteSingleRegister
    ) {
        (min, max) = (1, 1);
    }
    if length < min || length > max {
        return Err(ModbusError::InvalidLength {
            function: function.to_u8(),
            length,
            min,
            max,
        });
    }

    let offset = band
        .offset(address)
        .ok_or(ModbusError::AddressOutOfRange { address })?;

    debug!(
        "Resolved PLC address {} ({:?}, len={}) -> {} offset={} FC={:02X}",
        address,
        mode,
        length,
        band.space,
        offset,
        function.to_u8()
    );

    Ok(ResolvedAddress {
        function,
        space: band.space,
        offset,
    })
}

fn select_function(
    space: RegisterSpace,
    mode: AccessMode,
    length: u16,
    config: &AddressingConfig,
) -> ModbusResult<ModbusFunction> {
    let function = match (space, mode) {
        (RegisterSpace::Coil, AccessMode::Read) => ModbusFunction::ReadCoils,
        (RegisterSpace::Coil, AccessMode::Write) if length == 1 => ModbusFunction::WriteSingleCoil,
        (RegisterSpace::Coil, AccessMode::Write) => ModbusFunction::WriteMultipleCoils,
        (RegisterSpace::DiscreteInput, _) => ModbusFunction::ReadDiscreteInputs,
        (RegisterSpace::InputRegister, _) => ModbusFunction::ReadInputRegisters,
        (RegisterSpace::HoldingRegister, AccessMode::Read) => ModbusFunction::ReadHoldingRegisters,
        (RegisterSpace::HoldingRegister, AccessMode::Write) if length == 1 => {
            ModbusFunction::WriteSingleRegister
        }
        (RegisterSpace::HoldingRegister, AccessMode::Write) => {
            ModbusFunction::WriteMultipleRegisters
        }
        (RegisterSpace::Extended, mode) => {
            let band = config.extended.ok_or_else(|| {
                ModbusError::configuration(
                    "extended register band (20001-29999) has no function codes configured",
                )
            })?;
            match mode {
                AccessMode::Read => band.read_function(),
                AccessMode::Write => band.write_function(length),
            }
        }
    };
    Ok(function)
}
