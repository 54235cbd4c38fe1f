//! Modbus protocol constants
//!
//! Function codes, exception codes, per-function quantity limits and the
//! Modicon (PLC-style) address band boundaries used by the address resolver.

// ============================================================================
// Frame Size Constants
// ============================================================================

/// Maximum PDU size accepted from the wire
///
/// RS485 ADU (256 bytes) - Slave Address (1 byte) - CRC (2 bytes) = 253 bytes
pub const MAX_PDU_SIZE: usize = 253;

// ============================================================================
// Quantity Limits
// ============================================================================

/// Maximum coils/discrete inputs for FC01/FC02 (Read Coils/Discrete Inputs)
///
/// Response PDU: FC(1) + byte count(1) + ceil(N / 8) bytes.
pub const MAX_READ_COILS: u16 = 2000;

/// Maximum registers for FC03/FC04 (Read Holding/Input Registers)
///
/// Response PDU: FC(1) + byte count(1) + N × 2 ≤ 253 → N ≤ 125.
pub const MAX_READ_REGISTERS: u16 = 125;

/// Maximum coils for FC15 (Write Multiple Coils)
///
/// Request PDU: FC(1) + address(2) + quantity(2) + byte count(1) + ceil(N / 8).
/// At 2000 coils that is 256 bytes, 3 over [`MAX_PDU_SIZE`]; the largest FC15
/// request that fits is 1968 coils (252 bytes). Devices that enforce the ADU
/// limit reject anything above that.
pub const MAX_WRITE_COILS: u16 = 2000;

/// Maximum registers for FC16 (Write Multiple Registers)
///
/// Also bounds the write half of FC23 (Read/Write Multiple Registers).
pub const MAX_WRITE_REGISTERS: u16 = 120;

/// Maximum queued values returned by FC24 (Read FIFO Queue)
pub const MAX_FIFO_COUNT: u16 = 31;

/// Coil ON value for FC05
pub const COIL_ON: u16 = 0xFF00;

/// Coil OFF value for FC05
pub const COIL_OFF: u16 = 0x0000;

/// Bit set in a response function code to flag an exception
pub const EXCEPTION_FLAG: u8 = 0x80;

// ============================================================================
// Modbus Function Codes
// ============================================================================

/// Read Coils (FC01)
pub const FC_READ_COILS: u8 = 0x01;

/// Read Discrete Inputs (FC02)
pub const FC_READ_DISCRETE_INPUTS: u8 = 0x02;

/// Read Holding Registers (FC03)
pub const FC_READ_HOLDING_REGISTERS: u8 = 0x03;

/// Read Input Registers (FC04)
pub const FC_READ_INPUT_REGISTERS: u8 = 0x04;

/// Write Single Coil (FC05)
pub const FC_WRITE_SINGLE_COIL: u8 = 0x05;

/// Write Single Register (FC06)
pub const FC_WRITE_SINGLE_REGISTER: u8 = 0x06;

/// Write Multiple Coils (FC15)
pub const FC_WRITE_MULTIPLE_COILS: u8 = 0x0F;

/// Write Multiple Registers (FC16)
pub const FC_WRITE_MULTIPLE_REGISTERS: u8 = 0x10;

/// Mask Write Register (FC22)
pub const FC_MASK_WRITE_REGISTER: u8 = 0x16;

/// Read/Write Multiple Registers (FC23)
pub const FC_READ_WRITE_MULTIPLE_REGISTERS: u8 = 0x17;

/// Read FIFO Queue (FC24)
pub const FC_READ_FIFO_QUEUE: u8 = 0x18;

// ============================================================================
// Modbus Exception Codes
// ============================================================================

/// Illegal Function
pub const EXCEPTION_ILLEGAL_FUNCTION: u8 = 0x01;

/// Illegal Data Address
pub const EXCEPTION_ILLEGAL_DATA_ADDRESS: u8 = 0x02;

/// Illegal Data Value
pub const EXCEPTION_ILLEGAL_DATA_VALUE: u8 = 0x03;

/// Server Device Failure
pub const EXCEPTION_SERVER_DEVICE_FAILURE: u8 = 0x04;

/// Acknowledge
pub const EXCEPTION_ACKNOWLEDGE: u8 = 0x05;

/// Server Device Busy
pub const EXCEPTION_SERVER_DEVICE_BUSY: u8 = 0x06;

/// Memory Parity Error
pub const EXCEPTION_MEMORY_PARITY_ERROR: u8 = 0x08;

/// Gateway Path Unavailable
pub const EXCEPTION_GATEWAY_PATH_UNAVAILABLE: u8 = 0x0A;

/// Gateway Target Device Failed to Respond
pub const EXCEPTION_GATEWAY_TARGET_FAILED: u8 = 0x0B;

// ============================================================================
// Modicon Address Bands
// ============================================================================
//
// The first address of a band is offset 0, so 40001 is holding register 0
// and 40101 is holding register 100.

/// Coils: 1-9999
pub const COIL_FIRST: u32 = 1;
pub const COIL_LAST: u32 = 9_999;

/// Discrete inputs: 10001-19999
pub const DISCRETE_INPUT_FIRST: u32 = 10_001;
pub const DISCRETE_INPUT_LAST: u32 = 19_999;

/// Vendor-dependent extended ("float") registers: 20001-29999
pub const EXTENDED_FIRST: u32 = 20_001;
pub const EXTENDED_LAST: u32 = 29_999;

/// Input registers: 30001-39999
pub const INPUT_REGISTER_FIRST: u32 = 30_001;
pub const INPUT_REGISTER_LAST: u32 = 39_999;

/// Holding registers, five-digit form: 40001-49999
pub const HOLDING_REGISTER_FIRST: u32 = 40_001;
pub const HOLDING_REGISTER_LAST: u32 = 49_999;

/// Holding registers, six-digit form: 400001-465535
pub const HOLDING_REGISTER_WIDE_FIRST: u32 = 400_001;
pub const HOLDING_REGISTER_WIDE_LAST: u32 = 465_535;
