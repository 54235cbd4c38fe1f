//! Response PDU parsing
//!
//! [`parse_response`] checks a response PDU against the request that
//! produced it and unpacks the typed result:
//!
//! 1. `request_fc | 0x80` → the next byte is an exception code; fail with
//!    [`ModbusError::Exception`].
//! 2. Any other function code but `request_fc` → [`ModbusError::FunctionMismatch`].
//! 3. Reads: the byte count must equal `ceil(count / 8)` (bits) or
//!    `2 * count` (registers), else [`ModbusError::ByteCountMismatch`].
//! 4. Writes: the echoed address and value/quantity must match the request.

use tracing::{debug, warn};

use crate::constants::{EXCEPTION_FLAG, MAX_FIFO_COUNT};
use crate::error::{ModbusError, ModbusResult};
use crate::exception::decode_exception;
use crate::instruction::{Payload, RequestIns};
use crate::pdu::{unpack_bits, ProtocolDataUnit};
use crate::protocol::ModbusFunction;

/// Typed result of a successful exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModbusResponse {
    /// FC01/FC02, exactly the requested number of bits.
    Bits(Vec<bool>),
    /// FC03/FC04/FC23.
    Registers(Vec<u16>),
    /// FC05/FC06 echo.
    SingleWrite { address: u16, value: u16 },
    /// FC15/FC16 echo.
    MultipleWrite { address: u16, quantity: u16 },
    /// FC22 echo.
    MaskWrite {
        address: u16,
        and_mask: u16,
        or_mask: u16,
    },
    /// FC24 queue contents.
    FifoQueue(Vec<u16>),
}

impl ModbusResponse {
    pub fn into_bits(self) -> ModbusResult<Vec<bool>> {
        match self {
            Self::Bits(bits) => Ok(bits),
            other => Err(ModbusError::invalid_data(format!(
                "expected bit values, got {other:?}"
            ))),
        }
    }

    pub fn into_registers(self) -> ModbusResult<Vec<u16>> {
        match self {
            Self::Registers(registers) | Self::FifoQueue(registers) => Ok(registers),
            other => Err(ModbusError::invalid_data(format!(
                "expected register values, got {other:?}"
            ))),
        }
    }
}

/// Parse `pdu` as the response to `request`.
///
/// `request` must pass [`RequestIns::check`]; write echoes are compared
/// against its payload.
pub fn parse_response(request: &RequestIns, pdu: &ProtocolDataUnit) -> ModbusResult<ModbusResponse> {
    let function = request.check()?;
    let expected_fc = function.to_u8();
    let data = pdu.data();

    if pdu.function_code() == expected_fc | EXCEPTION_FLAG {
        let &[code] = data else {
            return Err(ModbusError::protocol(format!(
                "Exception response must carry exactly one code byte, got {}",
                data.len()
            )));
        };
        let err = decode_exception(expected_fc, code);
        warn!("Device rejected {}: {}", function.name(), err);
        return Err(err);
    }

    if pdu.function_code() != expected_fc {
        return Err(ModbusError::FunctionMismatch {
            expected: expected_fc,
            actual: pdu.function_code(),
        });
    }

    let response = match function {
        function if function.is_bit_read() => {
            let count = request.data_length as usize;
            let bytes = counted_payload(data, count.div_ceil(8))?;
            ModbusResponse::Bits(unpack_bits(bytes, count))
        }
        function if function.is_register_read() => {
            let bytes = counted_payload(data, request.data_length as usize * 2)?;
            ModbusResponse::Registers(to_registers(bytes))
        }
        ModbusFunction::WriteSingleCoil | ModbusFunction::WriteSingleRegister => {
            let [address, value] = fixed_words::<2>(data)?;
            let Payload::Value(expected_value) = request.payload else {
                return Err(payload_mismatch(function, &request.payload));
            };
            check_echo(function, (request.start_addr, expected_value), (address, value))?;
            ModbusResponse::SingleWrite { address, value }
        }
        ModbusFunction::WriteMultipleCoils | ModbusFunction::WriteMultipleRegisters => {
            let [address, quantity] = fixed_words::<2>(data)?;
            check_echo(
                function,
                (request.start_addr, request.data_length),
                (address, quantity),
            )?;
            ModbusResponse::MultipleWrite { address, quantity }
        }
        ModbusFunction::MaskWriteRegister => {
            let [address, and_mask, or_mask] = fixed_words::<3>(data)?;
            let Payload::Mask {
                and_mask: expected_and,
                or_mask: expected_or,
            } = request.payload
            else {
                return Err(payload_mismatch(function, &request.payload));
            };
            check_echo(
                function,
                (request.start_addr, expected_and, expected_or),
                (address, and_mask, or_mask),
            )?;
            ModbusResponse::MaskWrite {
                address,
                and_mask,
                or_mask,
            }
        }
        ModbusFunction::ReadFifoQueue => ModbusResponse::FifoQueue(parse_fifo(data)?),
        // Reads are all covered by the predicate arms above.
        _ => return Err(ModbusError::invalid_function(expected_fc)),
    };

    if function.is_write() {
        debug!("{} acknowledged at address {}", function.name(), request.start_addr);
    } else {
        debug!(
            "Parsed {} response: {} payload bytes",
            function.name(),
            data.len()
        );
    }
    Ok(response)
}

fn payload_mismatch(function: ModbusFunction, payload: &Payload) -> ModbusError {
    ModbusError::invalid_data(format!(
        "{} request carries a mismatched payload: {:?}",
        function.name(),
        payload
    ))
}

/// Byte-count-prefixed payload whose count must equal `expected`.
fn counted_payload(data: &[u8], expected: usize) -> ModbusResult<&[u8]> {
    let (&byte_count, rest) = data
        .split_first()
        .ok_or_else(|| ModbusError::protocol("Response missing byte count"))?;
    let byte_count = byte_count as usize;
    if byte_count != expected {
        return Err(ModbusError::ByteCountMismatch {
            expected,
            actual: byte_count,
        });
    }
    if rest.len() != byte_count {
        return Err(ModbusError::protocol(format!(
            "Byte count {} does not match {} payload bytes",
            byte_count,
            rest.len()
        )));
    }
    Ok(rest)
}

fn fixed_words<const N: usize>(data: &[u8]) -> ModbusResult<[u16; N]> {
    if data.len() != N * 2 {
        return Err(ModbusError::protocol(format!(
            "Expected {} payload bytes, got {}",
            N * 2,
            data.len()
        )));
    }
    let mut words = [0u16; N];
    for (word, chunk) in words.iter_mut().zip(data.chunks_exact(2)) {
        *word = u16::from_be_bytes([chunk[0], chunk[1]]);
    }
    Ok(words)
}

fn check_echo<T>(function: ModbusFunction, expected: T, actual: T) -> ModbusResult<()>
where
    T: PartialEq + std::fmt::Debug,
{
    if expected != actual {
        return Err(ModbusError::protocol(format!(
            "{} echo mismatch: expected {:04X?}, got {:04X?}",
            function.name(),
            expected,
            actual
        )));
    }
    Ok(())
}

fn to_registers(bytes: &[u8]) -> Vec<u16> {
    bytes
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect()
}

/// FC24 layout: byte count (2) + FIFO count (2) + FIFO count × register.
fn parse_fifo(data: &[u8]) -> ModbusResult<Vec<u16>> {
    if data.len() < 4 {
        return Err(ModbusError::protocol(format!(
            "FIFO response too short: {} bytes",
            data.len()
        )));
    }
    let byte_count = u16::from_be_bytes([data[0], data[1]]) as usize;
    let fifo_count = u16::from_be_bytes([data[2], data[3]]);
    if fifo_count > MAX_FIFO_COUNT {
        return Err(ModbusError::protocol(format!(
            "FIFO count {} exceeds {}",
            fifo_count, MAX_FIFO_COUNT
        )));
    }
    let expected = 2 + fifo_count as usize * 2;
    if byte_count != expected {
        return Err(ModbusError::ByteCountMismatch {
            expected,
            actual: byte_count,
        });
    }
    let values = &data[4..];
    if values.len() != fifo_count as usize * 2 {
        return Err(ModbusError::protocol(format!(
            "FIFO count {} does not match {} payload bytes",
            fifo_count,
            values.len()
        )));
    }
    Ok(to_registers(values))
}
