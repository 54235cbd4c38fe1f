//! Build a request, synthesize the well-formed reply a device would send,
//! and check that parsing recovers what was requested.

use voltage_modbus_ins::pdu::pack_bits;
use voltage_modbus_ins::{
    build, parse_response, ErrorKind, ModbusError, ModbusException, ModbusFunction,
    ModbusResponse, Payload, PduBuilder, ProtocolDataUnit, RequestIns,
};

fn exchange(request: &RequestIns, reply: &[u8]) -> Result<ModbusResponse, ModbusError> {
    PduBuilder::build_request(request)?;
    let pdu = ProtocolDataUnit::from_slice(reply)?;
    parse_response(request, &pdu)
}

/// The reply to a write echoes the first four bytes after the function code.
fn write_echo(request: &RequestIns) -> Vec<u8> {
    let pdu = PduBuilder::build_request(request).unwrap().to_bytes();
    pdu[..5].to_vec()
}

fn register_reply(function_code: u8, values: &[u16]) -> Vec<u8> {
    let mut raw = vec![function_code, (values.len() * 2) as u8];
    for value in values {
        raw.extend_from_slice(&value.to_be_bytes());
    }
    raw
}

#[test]
fn read_holding_registers_scenario() {
    let request = RequestIns {
        function_code: 3,
        start_addr: 0x006B,
        data_length: 3,
        payload: Payload::None,
    };
    let pdu = PduBuilder::build_request(&request).unwrap();
    assert_eq!(pdu.to_bytes().as_ref(), &[0x03, 0x00, 0x6B, 0x00, 0x03]);

    let response = exchange(&request, &[0x03, 0x06, 0x02, 0x2B, 0x00, 0x00, 0x00, 0x64]).unwrap();
    assert_eq!(response.into_registers().unwrap(), vec![0x022B, 0x0000, 0x0064]);
}

#[test]
fn exception_scenario() {
    let request = RequestIns::read_holding_registers(0x006B, 3);
    let err = exchange(&request, &[0x83, 0x02]).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Exception);
    assert_eq!(err.exception(), Some(ModbusException::IllegalDataAddress));
    assert_eq!(
        err.exception().map(ModbusException::name),
        Some("illegal data address")
    );
    assert!(matches!(err, ModbusError::Exception { function: 3, .. }));
    assert!(!err.is_retryable());
}

#[test]
fn invalid_coil_value_scenario() {
    let result = build(0x05, 0x0000, 1, Some(Payload::Value(0x1234)));
    let err = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn coils_roundtrip() {
    let bits: Vec<bool> = (0..19).map(|i| i % 3 != 1).collect();
    let packed = pack_bits(&bits);
    assert_eq!(packed, [0x6D, 0xDB, 0x06]);
    for function in [ModbusFunction::ReadCoils, ModbusFunction::ReadDiscreteInputs] {
        let request = RequestIns::new(function, 0x0013, bits.len() as u16);
        let mut reply = vec![function.to_u8()];
        reply.push(packed.len() as u8);
        reply.extend_from_slice(&packed);

        let response = exchange(&request, &reply).unwrap();
        assert_eq!(response.into_bits().unwrap(), bits);
    }
}

#[test]
fn padding_bits_ignored() {
    let request = RequestIns::read_coils(0, 3);
    let response = exchange(&request, &[0x01, 0x01, 0xFD]).unwrap();
    assert_eq!(response, ModbusResponse::Bits(vec![true, false, true]));
}

#[test]
fn registers_roundtrip() {
    let values: Vec<u16> = (0..125).map(|i| i * 7).collect();
    for function in [
        ModbusFunction::ReadHoldingRegisters,
        ModbusFunction::ReadInputRegisters,
    ] {
        let request = RequestIns::new(function, 0, values.len() as u16);
        let response = exchange(&request, &register_reply(function.to_u8(), &values)).unwrap();
        assert_eq!(response.into_registers().unwrap(), values);
    }
}

#[test]
fn single_writes_roundtrip() {
    let coil = RequestIns::write_single_coil(0x00AC, true);
    assert_eq!(
        exchange(&coil, &write_echo(&coil)).unwrap(),
        ModbusResponse::SingleWrite {
            address: 0x00AC,
            value: 0xFF00
        }
    );

    let register = RequestIns::write_single_register(0x0001, 0x0003);
    assert_eq!(
        exchange(&register, &write_echo(&register)).unwrap(),
        ModbusResponse::SingleWrite {
            address: 0x0001,
            value: 0x0003
        }
    );
}

#[test]
fn multiple_writes_roundtrip() {
    let coils = RequestIns::write_multiple_coils(
        0x0013,
        &[true, false, true, true, false, false, true, true, true, false],
    );
    assert_eq!(
        exchange(&coils, &write_echo(&coils)).unwrap(),
        ModbusResponse::MultipleWrite {
            address: 0x0013,
            quantity: 10
        }
    );

    let registers = RequestIns::write_multiple_registers(0x0001, &[0x000A, 0x0102]);
    assert_eq!(
        exchange(&registers, &write_echo(&registers)).unwrap(),
        ModbusResponse::MultipleWrite {
            address: 0x0001,
            quantity: 2
        }
    );
}

#[test]
fn mask_write_roundtrip() {
    let request = RequestIns::mask_write_register(0x0004, 0x00F2, 0x0025);
    let reply = PduBuilder::build_request(&request).unwrap().to_bytes();
    assert_eq!(
        exchange(&request, &reply).unwrap(),
        ModbusResponse::MaskWrite {
            address: 0x0004,
            and_mask: 0x00F2,
            or_mask: 0x0025
        }
    );
}

#[test]
fn read_write_registers_roundtrip() {
    let request = RequestIns::read_write_multiple_registers(0x0003, 6, 0x000E, &[0x00FF; 3]);
    let values = [0x00FE, 0x0ACD, 0x0001, 0x0003, 0x000D, 0x00FF];
    let response = exchange(&request, &register_reply(0x17, &values)).unwrap();
    assert_eq!(response, ModbusResponse::Registers(values.to_vec()));
}

#[test]
fn fifo_roundtrip() {
    let request = RequestIns::read_fifo_queue(0x04DE);
    let reply = [0x18, 0x00, 0x06, 0x00, 0x02, 0x01, 0xB8, 0x12, 0x84];
    let response = exchange(&request, &reply).unwrap();
    assert_eq!(response, ModbusResponse::FifoQueue(vec![0x01B8, 0x1284]));
}

#[test]
fn byte_count_mismatch_is_malformed() {
    let request = RequestIns::read_holding_registers(0, 3);
    let err = exchange(&request, &register_reply(0x03, &[1, 2])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    assert!(matches!(
        err,
        ModbusError::ByteCountMismatch {
            expected: 6,
            actual: 4
        }
    ));
}

#[test]
fn mismatched_function_is_malformed() {
    let request = RequestIns::read_holding_registers(0, 1);
    let err = exchange(&request, &[0x04, 0x02, 0x00, 0x01]).unwrap_err();
    assert!(matches!(
        err,
        ModbusError::FunctionMismatch {
            expected: 0x03,
            actual: 0x04
        }
    ));

    // Fault bit on a different function is not this request's exception.
    let err = exchange(&request, &[0x84, 0x02]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedResponse);
}

#[test]
fn write_echo_mismatch_is_malformed() {
    let request = RequestIns::write_single_register(0x0001, 0x0003);
    let err = exchange(&request, &[0x06, 0x00, 0x01, 0x00, 0x04]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedResponse);
}

#[test]
fn busy_and_acknowledge_are_retryable() {
    let request = RequestIns::read_input_registers(0, 1);
    for (code, retryable) in [(0x05, true), (0x06, true), (0x04, false), (0x42, false)] {
        let err = exchange(&request, &[0x84, code]).unwrap_err();
        assert_eq!(err.is_retryable(), retryable, "exception code {code:#04X}");
    }
}

#[test]
fn nothing_built_for_out_of_bound_lengths() {
    for (function_code, length) in [(0x01, 2001), (0x03, 126), (0x04, 0), (0x0F, 0)] {
        assert!(
            build(function_code, 0, length, None).is_err(),
            "FC {function_code:#04X} length {length}"
        );
    }
    let err = build(0x07, 0, 1, None).unwrap_err();
    assert!(matches!(err, ModbusError::InvalidFunction { code: 0x07 }));
}
