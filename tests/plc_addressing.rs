//! Properties of Modicon address resolution.

use proptest::prelude::*;
use voltage_modbus_ins::{
    resolve, AccessMode, AddressingConfig, ErrorKind, ExtendedBand, ExtendedRead, ExtendedWrite,
    ModbusError, ModbusFunction, PlcRequestIns, RegisterSpace,
};

fn configured() -> AddressingConfig {
    AddressingConfig::new().with_extended_band(ExtendedBand {
        read: ExtendedRead::HoldingRegisters,
        write: ExtendedWrite::Auto,
    })
}

fn outside_every_band() -> impl Strategy<Value = u32> {
    prop_oneof![
        Just(0u32),
        10_000u32..=10_000,
        20_000u32..=20_000,
        30_000u32..=30_000,
        40_000u32..=40_000,
        50_000u32..=400_000,
        465_536u32..,
    ]
}

proptest! {
    #[test]
    fn coil_reads_map_to_fc01(address in 1u32..=9_999, length in 1u16..=2000) {
        let resolved = resolve(address, AccessMode::Read, length, &configured()).unwrap();
        prop_assert_eq!(resolved.function, ModbusFunction::ReadCoils);
        prop_assert_eq!(resolved.space, RegisterSpace::Coil);
        prop_assert_eq!(resolved.offset as u32, address - 1);
    }

    #[test]
    fn coil_writes_pick_single_or_multiple(address in 1u32..=9_999, length in 1u16..=2000) {
        let resolved = resolve(address, AccessMode::Write, length, &configured()).unwrap();
        let expected = if length == 1 {
            ModbusFunction::WriteSingleCoil
        } else {
            ModbusFunction::WriteMultipleCoils
        };
        prop_assert_eq!(resolved.function, expected);
        prop_assert_eq!(resolved.offset as u32, address - 1);
    }

    #[test]
    fn discrete_inputs_are_read_only(address in 10_001u32..=19_999, length in 1u16..=2000) {
        let resolved = resolve(address, AccessMode::Read, length, &configured()).unwrap();
        prop_assert_eq!(resolved.function, ModbusFunction::ReadDiscreteInputs);
        prop_assert_eq!(resolved.offset as u32, address - 10_001);

        let err = resolve(address, AccessMode::Write, length, &configured()).unwrap_err();
        let is_read_only = matches!(err, ModbusError::ReadOnlySpace { .. });
        prop_assert!(is_read_only);
    }

    #[test]
    fn input_registers_are_read_only(address in 30_001u32..=39_999, length in 1u16..=125) {
        let resolved = resolve(address, AccessMode::Read, length, &configured()).unwrap();
        prop_assert_eq!(resolved.function, ModbusFunction::ReadInputRegisters);
        prop_assert_eq!(resolved.offset as u32, address - 30_001);

        let err = resolve(address, AccessMode::Write, length, &configured()).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn holding_registers_five_digit(address in 40_001u32..=49_999, length in 1u16..=120) {
        let read = resolve(address, AccessMode::Read, length, &configured()).unwrap();
        prop_assert_eq!(read.function, ModbusFunction::ReadHoldingRegisters);
        prop_assert_eq!(read.offset as u32, address - 40_001);

        let write = resolve(address, AccessMode::Write, length, &configured()).unwrap();
        let expected = if length == 1 {
            ModbusFunction::WriteSingleRegister
        } else {
            ModbusFunction::WriteMultipleRegisters
        };
        prop_assert_eq!(write.function, expected);
        prop_assert_eq!(write.offset, read.offset);
    }

    #[test]
    fn holding_registers_six_digit(address in 400_001u32..=465_535, length in 1u16..=125) {
        let resolved = resolve(address, AccessMode::Read, length, &configured()).unwrap();
        prop_assert_eq!(resolved.function, ModbusFunction::ReadHoldingRegisters);
        prop_assert_eq!(resolved.space, RegisterSpace::HoldingRegister);
        prop_assert_eq!(resolved.offset as u32, address - 400_001);
    }

    #[test]
    fn extended_band_follows_configuration(address in 20_001u32..=29_999, length in 1u16..=120) {
        let read = resolve(address, AccessMode::Read, length, &configured()).unwrap();
        prop_assert_eq!(read.function, ModbusFunction::ReadHoldingRegisters);
        prop_assert_eq!(read.space, RegisterSpace::Extended);
        prop_assert_eq!(read.offset as u32, address - 20_001);

        let err = resolve(address, AccessMode::Read, length, &AddressingConfig::new()).unwrap_err();
        let is_configuration = matches!(err, ModbusError::Configuration { .. });
        prop_assert!(is_configuration);
    }

    #[test]
    fn out_of_band_addresses_never_clamp(address in outside_every_band(), write in any::<bool>()) {
        let err = resolve(address, AccessMode::from(write), 1, &configured()).unwrap_err();
        let is_out_of_range = matches!(err, ModbusError::AddressOutOfRange { address: a } if a == address);
        prop_assert!(is_out_of_range);
        prop_assert!(!PlcRequestIns::new(write, address, 1).validate());
    }

    #[test]
    fn register_reads_over_125_rejected(address in 40_001u32..=49_999, length in 126u16..) {
        let err = resolve(address, AccessMode::Read, length, &configured()).unwrap_err();
        let is_invalid_length = matches!(err, ModbusError::InvalidLength { max: 125, .. });
        prop_assert!(is_invalid_length);
    }

    #[test]
    fn validate_agrees_with_resolve(address in 1u32..=470_000, length in 0u16..=2100, write in any::<bool>()) {
        let instruction = PlcRequestIns::new(write, address, length);
        let resolved = instruction.to_request(&configured());
        if resolved.is_ok() {
            prop_assert!(instruction.validate());
        }
    }
}

#[test]
fn scenario_40101_reads_holding_register_100() {
    let resolved = resolve(40101, AccessMode::Read, 2, &AddressingConfig::new()).unwrap();
    assert_eq!(resolved.function.to_u8(), 0x03);
    assert_eq!(resolved.offset, 100);
}
