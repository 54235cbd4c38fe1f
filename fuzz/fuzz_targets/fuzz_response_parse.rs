//! Parse arbitrary bytes as the response to an arbitrary request.
//!
//! Parsing must never panic; a successful parse must honor the requested
//! count.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use voltage_modbus_ins::{
    parse_response, ModbusFunction, ModbusResponse, Payload, ProtocolDataUnit, RequestIns,
};

#[derive(Debug, Arbitrary)]
struct Input {
    function_code: u8,
    start_addr: u16,
    data_length: u16,
    value: u16,
    response: Vec<u8>,
}

/// A payload of the shape `function` takes, so the request can pass `check`.
fn payload_for(function: Option<ModbusFunction>, input: &Input) -> Payload {
    let count = input.data_length as usize;
    match function {
        Some(ModbusFunction::WriteSingleCoil) => Payload::coil(input.value & 1 == 1),
        Some(ModbusFunction::WriteSingleRegister) => Payload::Value(input.value),
        Some(ModbusFunction::WriteMultipleCoils) => Payload::Coils(vec![true; count.min(2000)]),
        Some(ModbusFunction::WriteMultipleRegisters) => {
            Payload::Registers(vec![input.value; count.min(120)])
        }
        Some(ModbusFunction::MaskWriteRegister) => Payload::Mask {
            and_mask: input.value,
            or_mask: !input.value,
        },
        Some(ModbusFunction::ReadWriteMultipleRegisters) => Payload::ReadWrite {
            write_address: input.start_addr,
            values: vec![input.value],
        },
        _ => Payload::None,
    }
}

fuzz_target!(|input: Input| {
    let function = ModbusFunction::from_u16(input.function_code.into()).ok();
    let request = RequestIns {
        function_code: input.function_code.into(),
        start_addr: input.start_addr,
        data_length: input.data_length,
        payload: payload_for(function, &input),
    };

    let Ok(pdu) = ProtocolDataUnit::from_slice(&input.response) else {
        return;
    };

    match parse_response(&request, &pdu) {
        Ok(ModbusResponse::Bits(bits)) => assert_eq!(bits.len(), input.data_length as usize),
        Ok(ModbusResponse::Registers(registers)) => {
            assert_eq!(registers.len(), input.data_length as usize)
        }
        Ok(ModbusResponse::FifoQueue(values)) => assert!(values.len() <= 31),
        _ => {}
    }
});
