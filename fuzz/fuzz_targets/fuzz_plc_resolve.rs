//! Resolve arbitrary PLC instructions and build their PDUs.
//!
//! Whatever resolves must build, and must land inside its band. Only FC15
//! near its 2000-coil limit may exceed `MAX_PDU_SIZE`.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use voltage_modbus_ins::{
    address, AccessMode, AddressingConfig, ExtendedBand, ExtendedRead, ExtendedWrite,
    ModbusFunction, Payload, PduBuilder, PlcRequestIns, MAX_PDU_SIZE,
};

#[derive(Debug, Arbitrary)]
struct Input {
    write: bool,
    address: u32,
    length: u16,
    extended: bool,
    value: u16,
}

fuzz_target!(|input: Input| {
    let config = if input.extended {
        AddressingConfig::new().with_extended_band(ExtendedBand {
            read: ExtendedRead::InputRegisters,
            write: ExtendedWrite::Auto,
        })
    } else {
        AddressingConfig::new()
    };
    let mode = AccessMode::from(input.write);

    let Ok(resolved) = address::resolve(input.address, mode, input.length, &config) else {
        return;
    };
    let band = address::band_for(input.address).expect("resolved address has a band");
    assert_eq!(band.offset(input.address), Some(resolved.offset));

    let length = input.length as usize;
    let instruction = match (mode, resolved.function) {
        (AccessMode::Read, _) => PlcRequestIns::read(input.address, input.length),
        (_, ModbusFunction::WriteSingleCoil | ModbusFunction::WriteMultipleCoils) => {
            PlcRequestIns::write(input.address, Payload::Coils(vec![input.value & 1 == 1; length]))
        }
        _ => PlcRequestIns::write(input.address, Payload::Registers(vec![input.value; length])),
    };
    let request = instruction
        .to_request(&config)
        .expect("resolved instruction converts");
    assert_eq!(request.function_code, u16::from(resolved.function.to_u8()));
    let pdu = PduBuilder::build_request(&request).expect("resolved instruction builds");

    if resolved.function == ModbusFunction::WriteMultipleCoils {
        assert!(pdu.len() <= 1 + 2 + 2 + 1 + 250);
    } else {
        assert!(pdu.len() <= MAX_PDU_SIZE);
    }
});
