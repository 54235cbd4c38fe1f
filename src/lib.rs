//! # Voltage Modbus INS - Modbus Instruction and PDU Layer
//!
//! **Author:** Evan Liu <liuyifanz.1996@gmail.com>
//! **License:** MIT
//!
//! Turns high-level Modbus instructions into protocol data units (PDUs) and
//! typed results, independent of the transport that carries them.
//!
//! ## Features
//!
//! - **Two addressing styles**: explicit function code + offset, or
//!   Modicon/PLC addresses such as `40101` resolved to FC 03 offset 100
//! - **Validated before the wire**: quantities, coil values and read-only
//!   spaces are checked locally
//! - **Typed responses**: bits, registers, write echoes and FIFO contents
//! - **Transport agnostic**: TCP, RTU and ASCII plug in through the
//!   [`Packager`] and [`Transporter`] traits
//! - **Classified errors**: validation, exception, malformed response and
//!   transport failures are distinguishable via [`ModbusError::kind`]
//!
//! ## Supported Function Codes
//!
//! | Code | Function | Build | Parse |
//! |------|----------|-------|-------|
//! | 0x01 | Read Coils | ✅ | ✅ |
//! | 0x02 | Read Discrete Inputs | ✅ | ✅ |
//! | 0x03 | Read Holding Registers | ✅ | ✅ |
//! | 0x04 | Read Input Registers | ✅ | ✅ |
//! | 0x05 | Write Single Coil | ✅ | ✅ |
//! | 0x06 | Write Single Register | ✅ | ✅ |
//! | 0x0F | Write Multiple Coils | ✅ | ✅ |
//! | 0x10 | Write Multiple Registers | ✅ | ✅ |
//! | 0x16 | Mask Write Register | ✅ | ✅ |
//! | 0x17 | Read/Write Multiple Registers | ✅ | ✅ |
//! | 0x18 | Read FIFO Queue | ✅ | ✅ |
//!
//! ## Quick Start
//!
//! ```rust
//! use voltage_modbus_ins::{
//!     parse_response, AddressingConfig, ModbusResponse, PduBuilder, PlcRequestIns,
//!     ProtocolDataUnit,
//! };
//!
//! # fn main() -> voltage_modbus_ins::ModbusResult<()> {
//! let request = PlcRequestIns::read(40101, 2).to_request(&AddressingConfig::new())?;
//! let pdu = PduBuilder::build_request(&request)?;
//! assert_eq!(pdu.to_bytes().as_ref(), &[0x03, 0x00, 0x64, 0x00, 0x02]);
//!
//! let reply = ProtocolDataUnit::from_slice(&[0x03, 0x04, 0x00, 0x0A, 0x00, 0x0B])?;
//! let response = parse_response(&request, &reply)?;
//! assert_eq!(response, ModbusResponse::Registers(vec![10, 11]));
//! # Ok(())
//! # }
//! ```
//!
//! With a transport, [`GenericModbusClient`] runs the full
//! build/encode/send/verify/decode/parse sequence:
//!
//! ```rust,ignore
//! use voltage_modbus_ins::{GenericModbusClient, ModbusClient};
//!
//! let mut client = GenericModbusClient::new(packager, transporter);
//! let values = client.read_03(0x006B, 3).await?;
//! client.write_06(100, 0x1234).await?;
//! ```

// ============================================================================
// Core modules
// ============================================================================

/// Core error types and result handling
pub mod error;

/// Modbus protocol constants
pub mod constants;

/// Exception code decoding
pub mod exception;

/// Supported function codes
pub mod protocol;

/// Normal and PLC-style request instructions
pub mod instruction;

/// Addressing configuration
pub mod config;

/// Modicon address resolution
pub mod address;

/// PDU building
pub mod pdu;

/// Response PDU parsing
pub mod response;

/// Packager and Transporter capabilities
pub mod transport;

/// Modbus client
pub mod client;

// ============================================================================
// Re-exports for convenience
// ============================================================================

// === Core client API ===
pub use client::{validate_instruction, GenericModbusClient, ModbusClient};

// === Error handling ===
pub use error::{BoxError, ErrorKind, ModbusError, ModbusResult};
pub use exception::{decode_exception, ModbusException};

// === Instructions ===
pub use config::{AddressingConfig, ExtendedBand, ExtendedRead, ExtendedWrite};
pub use instruction::{AccessMode, Instruction, Payload, PlcRequestIns, RequestIns};
pub use protocol::ModbusFunction;

// === Address resolution ===
pub use address::{resolve, RegisterSpace, ResolvedAddress};

// === PDU ===
pub use pdu::{build, PduBuilder, ProtocolDataUnit};
pub use response::{parse_response, ModbusResponse};

// === Transport capabilities ===
pub use transport::{Packager, Transporter};

// === Protocol limits (commonly needed constants) ===
pub use constants::{
    MAX_FIFO_COUNT, MAX_PDU_SIZE, MAX_READ_COILS, MAX_READ_REGISTERS, MAX_WRITE_COILS,
    MAX_WRITE_REGISTERS,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library information
pub fn info() -> String {
    format!(
        "Voltage Modbus INS v{} - Modbus instruction and PDU layer by Evan Liu",
        VERSION
    )
}
