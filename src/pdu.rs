//! Modbus PDU data structure and request builder
//!
//! A [`ProtocolDataUnit`] is the function code plus its function-specific
//! payload, independent of TCP/RTU/ASCII framing. [`PduBuilder`] packs the
//! big-endian request layout for every supported function.

use bytes::{BufMut, Bytes, BytesMut};
use tracing::{debug, warn};

use crate::constants::{EXCEPTION_FLAG, MAX_PDU_SIZE};
use crate::error::{ModbusError, ModbusResult};
use crate::instruction::{Payload, RequestIns};
use crate::protocol::ModbusFunction;

/// Function code and payload of a Modbus request or response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolDataUnit {
    function_code: u8,
    data: Bytes,
}

impl ProtocolDataUnit {
    pub fn new(function_code: u8, data: impl Into<Bytes>) -> Self {
        Self {
            function_code,
            data: data.into(),
        }
    }

    /// Parse a PDU from raw bytes (function code first).
    pub fn from_slice(raw: &[u8]) -> ModbusResult<Self> {
        debug!("Parsing PDU from slice: {} bytes", raw.len());

        let (&function_code, data) = raw
            .split_first()
            .ok_or_else(|| ModbusError::protocol("Empty response PDU"))?;

        if raw.len() > MAX_PDU_SIZE {
            return Err(ModbusError::protocol(format!(
                "PDU too large: {} bytes (max {})",
                raw.len(),
                MAX_PDU_SIZE
            )));
        }

        let pdu = Self::new(function_code, Bytes::copy_from_slice(data));
        let fc_desc = Self::function_code_description(function_code);
        match pdu.exception_code() {
            Some(exc_code) => debug!(
                "PDU parsed: FC={:02X} (Exception: {}), exception_code={:02X}",
                function_code, fc_desc, exc_code
            ),
            None => debug!(
                "PDU parsed: FC={:02X} ({}), data_len={}",
                function_code,
                fc_desc,
                pdu.data.len()
            ),
        }

        Ok(pdu)
    }

    #[inline]
    pub fn function_code(&self) -> u8 {
        self.function_code
    }

    /// Payload after the function code.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Length including the function code.
    #[inline]
    pub fn len(&self) -> usize {
        1 + self.data.len()
    }

    /// A PDU always carries a function code.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Serialized form: function code followed by the payload.
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.len());
        buf.put_u8(self.function_code);
        buf.extend_from_slice(&self.data);
        buf.freeze()
    }

    #[inline]
    pub fn is_exception(&self) -> bool {
        self.function_code & EXCEPTION_FLAG != 0
    }

    #[inline]
    pub fn exception_code(&self) -> Option<u8> {
        if self.is_exception() {
            self.data.first().copied()
        } else {
            None
        }
    }

    /// Human-readable function code description.
    pub fn function_code_description(fc: u8) -> &'static str {
        ModbusFunction::from_u8(fc & !EXCEPTION_FLAG)
            .map(ModbusFunction::name)
            .unwrap_or("Unknown Function")
    }
}

/// PDU builder - fluent API
pub struct PduBuilder {
    function_code: u8,
    data: BytesMut,
}

impl PduBuilder {
    #[inline]
    pub fn new(function_code: u8) -> Self {
        Self {
            function_code,
            data: BytesMut::with_capacity(MAX_PDU_SIZE),
        }
    }

    /// Add address
    #[inline]
    pub fn address(self, addr: u16) -> Self {
        self.word(addr)
    }

    /// Add quantity
    #[inline]
    pub fn quantity(self, qty: u16) -> Self {
        self.word(qty)
    }

    /// Add a big-endian 16-bit value
    #[inline]
    pub fn word(mut self, value: u16) -> Self {
        self.data.put_u16(value);
        self
    }

    /// Add a byte
    #[inline]
    pub fn byte(mut self, b: u8) -> Self {
        self.data.put_u8(b);
        self
    }

    /// Add raw data
    #[inline]
    pub fn data(mut self, data: &[u8]) -> Self {
        self.data.extend_from_slice(data);
        self
    }

    /// Add a byte count followed by big-endian registers
    ///
    /// At most 127 registers fit the one-byte count; callers validate the
    /// quantity first.
    pub fn registers(self, values: &[u16]) -> Self {
        debug_assert!(
            values.len() <= 127,
            "{} registers overflow the byte count",
            values.len()
        );
        let mut builder = self.byte((values.len() * 2) as u8);
        for &value in values {
            builder = builder.word(value);
        }
        builder
    }

    pub fn build(self) -> ProtocolDataUnit {
        debug!(
            "PDU built: FC={:02X} ({}), total_len={}",
            self.function_code,
            ProtocolDataUnit::function_code_description(self.function_code),
            1 + self.data.len()
        );
        ProtocolDataUnit {
            function_code: self.function_code,
            data: self.data.freeze(),
        }
    }

    /// Validate a request and build its PDU.
    ///
    /// Nothing is produced for a request that fails
    /// [`RequestIns::check`]: bad function code, length outside the
    /// per-function bound, FC05 value other than 0xFF00/0x0000, or a
    /// payload that does not match the function.
    pub fn build_request(request: &RequestIns) -> ModbusResult<ProtocolDataUnit> {
        let function = request.check()?;
        let builder = PduBuilder::new(function.to_u8()).address(request.start_addr);

        let pdu = match (function, &request.payload) {
            (
                ModbusFunction::ReadCoils
                | ModbusFunction::ReadDiscreteInputs
                | ModbusFunction::ReadHoldingRegisters
                | ModbusFunction::ReadInputRegisters,
                Payload::None,
            ) => builder.quantity(request.data_length).build(),
            (
                ModbusFunction::WriteSingleCoil | ModbusFunction::WriteSingleRegister,
                Payload::Value(value),
            ) => builder.word(*value).build(),
            (ModbusFunction::WriteMultipleCoils, Payload::Coils(values)) => {
                let packed = pack_bits(values);
                debug_assert_eq!(packed.len(), (request.data_length as usize).div_ceil(8));
                builder
                    .quantity(request.data_length)
                    .byte(packed.len() as u8)
                    .data(&packed)
                    .build()
            }
            (ModbusFunction::WriteMultipleRegisters, Payload::Registers(values)) => builder
                .quantity(request.data_length)
                .registers(values)
                .build(),
            (ModbusFunction::MaskWriteRegister, Payload::Mask { and_mask, or_mask }) => {
                builder.word(*and_mask).word(*or_mask).build()
            }
            (
                ModbusFunction::ReadWriteMultipleRegisters,
                Payload::ReadWrite {
                    write_address,
                    values,
                },
            ) => builder
                .quantity(request.data_length)
                .address(*write_address)
                .quantity(values.len() as u16)
                .registers(values)
                .build(),
            (ModbusFunction::ReadFifoQueue, Payload::None) => builder.build(),
            (function, _) => {
                return Err(ModbusError::invalid_data(format!(
                    "unsupported payload for {}",
                    function.name()
                )))
            }
        };

        // Only FC15 near its 2000-coil limit gets here.
        if pdu.len() > MAX_PDU_SIZE {
            warn!(
                "{} request PDU is {} bytes, over the {}-byte ADU budget",
                function.name(),
                pdu.len(),
                MAX_PDU_SIZE
            );
        }

        Ok(pdu)
    }
}

/// Build the request PDU for a function code, start address, length and
/// optional payload.
pub fn build(
    function_code: u8,
    start_addr: u16,
    data_length: u16,
    payload: Option<Payload>,
) -> ModbusResult<ProtocolDataUnit> {
    let request = RequestIns {
        function_code: function_code.into(),
        start_addr,
        data_length,
        payload: payload.unwrap_or_default(),
    };
    PduBuilder::build_request(&request)
}

/// Pack booleans LSB-first, eight per byte.
pub fn pack_bits(values: &[bool]) -> Vec<u8> {
    let mut packed = vec![0u8; values.len().div_ceil(8)];
    for (i, &value) in values.iter().enumerate() {
        if value {
            packed[i / 8] |= 1 << (i % 8);
        }
    }
    packed
}

/// Unpack `count` LSB-first bits; trailing padding bits are ignored.
pub fn unpack_bits(bytes: &[u8], count: usize) -> Vec<bool> {
    (0..count)
        .map(|i| bytes.get(i / 8).is_some_and(|byte| byte & (1 << (i % 8)) != 0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registers_byte_count() {
        let pdu = PduBuilder::new(0x10).registers(&[0u16; 127]).build();
        assert_eq!(pdu.data()[0], 254);
        assert_eq!(pdu.len(), 1 + 1 + 254);
    }

    #[test]
    fn test_write_coils_pdu_size() {
        let pdu = PduBuilder::build_request(&RequestIns::write_multiple_coils(0, &[true; 2000]))
            .unwrap();
        assert_eq!(pdu.len(), 256);
        assert!(pdu.len() > MAX_PDU_SIZE);

        let pdu = PduBuilder::build_request(&RequestIns::write_multiple_coils(0, &[true; 1968]))
            .unwrap();
        assert_eq!(pdu.len(), 252);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "128 registers overflow the byte count")]
    fn test_registers_count_overflow() {
        let _ = PduBuilder::new(0x10).registers(&[0u16; 128]);
    }

    #[test]
    fn test_pdu_basic_operations() {
        let pdu = ProtocolDataUnit::new(0x03, vec![0x01, 0x00, 0x00, 0x0A]);
        assert_eq!(pdu.function_code(), 0x03);
        assert!(!pdu.is_exception());
        assert_eq!(pdu.len(), 5);
        assert_eq!(pdu.to_bytes().as_ref(), &[0x03, 0x01, 0x00, 0x00, 0x0A]);
    }

    #[test]
    fn test_pdu_builder() {
        let pdu = PduBuilder::new(0x03).address(0x0100).quantity(0x000A).build();
        assert_eq!(pdu.len(), 5);
        assert_eq!(pdu.to_bytes().as_ref(), &[0x03, 0x01, 0x00, 0x00, 0x0A]);
    }

    #[test]
    fn test_exception_response() {
        let pdu = ProtocolDataUnit::from_slice(&[0x83, 0x02]).unwrap();
        assert!(pdu.is_exception());
        assert_eq!(pdu.exception_code(), Some(0x02));
        assert_eq!(
            ProtocolDataUnit::function_code_description(pdu.function_code()),
            "Read Holding Registers"
        );
    }

    #[test]
    fn test_from_slice_rejects_empty_and_oversized() {
        assert!(ProtocolDataUnit::from_slice(&[]).is_err());
        assert!(ProtocolDataUnit::from_slice(&[0x03; MAX_PDU_SIZE + 1]).is_err());
    }

    #[test]
    fn test_build_read_request() {
        let pdu = PduBuilder::build_request(&RequestIns::read_holding_registers(0x006B, 3)).unwrap();
        assert_eq!(pdu.function_code(), 0x03);
        assert_eq!(pdu.to_bytes().as_ref(), &[0x03, 0x00, 0x6B, 0x00, 0x03]);
    }

    #[test]
    fn test_build_write_single_coil() {
        let pdu = PduBuilder::build_request(&RequestIns::write_single_coil(0x00AC, true)).unwrap();
        assert_eq!(pdu.to_bytes().as_ref(), &[0x05, 0x00, 0xAC, 0xFF, 0x00]);
    }

    #[test]
    fn test_build_rejects_invalid_coil_value() {
        let err = build(0x05, 0x0000, 1, Some(Payload::Value(0x1234))).unwrap_err();
        assert!(matches!(err, ModbusError::InvalidValue { value: 0x1234, .. }));
    }

    #[test]
    fn test_build_write_single_register() {
        let pdu = PduBuilder::build_request(&RequestIns::write_single_register(0x0001, 0x0003))
            .unwrap();
        assert_eq!(pdu.to_bytes().as_ref(), &[0x06, 0x00, 0x01, 0x00, 0x03]);
    }

    #[test]
    fn test_build_write_multiple_coils() {
        let values = [
            true, false, true, true, false, false, true, true, true, false,
        ];
        let pdu = PduBuilder::build_request(&RequestIns::write_multiple_coils(0x0013, &values))
            .unwrap();
        assert_eq!(
            pdu.to_bytes().as_ref(),
            &[0x0F, 0x00, 0x13, 0x00, 0x0A, 0x02, 0xCD, 0x01]
        );
    }

    #[test]
    fn test_build_write_multiple_registers() {
        let pdu = PduBuilder::build_request(&RequestIns::write_multiple_registers(
            0x0001,
            &[0x000A, 0x0102],
        ))
        .unwrap();
        assert_eq!(
            pdu.to_bytes().as_ref(),
            &[0x10, 0x00, 0x01, 0x00, 0x02, 0x04, 0x00, 0x0A, 0x01, 0x02]
        );
    }

    #[test]
    fn test_build_mask_write_register() {
        let pdu = PduBuilder::build_request(&RequestIns::mask_write_register(0x0004, 0x00F2, 0x0025))
            .unwrap();
        assert_eq!(
            pdu.to_bytes().as_ref(),
            &[0x16, 0x00, 0x04, 0x00, 0xF2, 0x00, 0x25]
        );
    }

    #[test]
    fn test_build_read_write_multiple_registers() {
        let request =
            RequestIns::read_write_multiple_registers(0x0003, 6, 0x000E, &[0x00FF, 0x00FF, 0x00FF]);
        let pdu = PduBuilder::build_request(&request).unwrap();
        assert_eq!(
            pdu.to_bytes().as_ref(),
            &[
                0x17, 0x00, 0x03, 0x00, 0x06, 0x00, 0x0E, 0x00, 0x03, 0x06, 0x00, 0xFF, 0x00, 0xFF,
                0x00, 0xFF
            ]
        );
    }

    #[test]
    fn test_build_read_fifo_queue() {
        let pdu = PduBuilder::build_request(&RequestIns::read_fifo_queue(0x04DE)).unwrap();
        assert_eq!(pdu.to_bytes().as_ref(), &[0x18, 0x04, 0xDE]);
    }

    #[test]
    fn test_build_rejects_out_of_bound_lengths() {
        assert!(build(0x01, 0, 2001, None).is_err());
        assert!(build(0x03, 0, 0, None).is_err());
        assert!(build(0x04, 0, 126, None).is_err());
        assert!(build(0x2B, 0, 1, None).is_err());
    }

    #[test]
    fn test_bit_packing() {
        let values = [true, false, true, true, false, false, true, true, true];
        let packed = pack_bits(&values);
        assert_eq!(packed, vec![0xCD, 0x01]);
        assert_eq!(unpack_bits(&packed, values.len()), values);
        // padding bits past the count are dropped
        assert_eq!(unpack_bits(&[0xFF], 3), vec![true, true, true]);
    }
}
