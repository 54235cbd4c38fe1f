//! Voltage Modbus INS Demo
//!
//! Offline walkthrough of the instruction layer:
//! - PLC (Modicon) address resolution
//! - Request PDU building for normal and PLC-style instructions
//! - Parsing canned responses, including an exception response
//!
//! Usage: cargo run --bin demo [plc_address...]
//! Example: cargo run --bin demo 40101 10001 30005

use voltage_modbus_ins::{
    parse_response, resolve, AccessMode, AddressingConfig, ExtendedBand, ExtendedRead,
    ExtendedWrite, ModbusFunction, ModbusResult, Payload, PduBuilder, PlcRequestIns,
    ProtocolDataUnit, RequestIns,
};

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🚀 {}", voltage_modbus_ins::info());
    println!("==========================================\n");

    let config = AddressingConfig::new().with_extended_band(ExtendedBand {
        read: ExtendedRead::HoldingRegisters,
        write: ExtendedWrite::Auto,
    });

    // =========================================================================
    // Part 1: PLC address resolution
    // =========================================================================
    println!("📍 Part 1: PLC Address Resolution");
    println!("----------------------------------");

    let mut addresses: Vec<u32> = std::env::args()
        .skip(1)
        .map(|arg| arg.parse())
        .collect::<Result<_, _>>()?;
    if addresses.is_empty() {
        addresses = vec![1, 10001, 20001, 30001, 40101, 400001, 50000];
    }

    for address in addresses {
        match resolve(address, AccessMode::Read, 1, &config) {
            Ok(resolved) => println!(
                "  {:>6} -> {} offset {} ({})",
                address, resolved.space, resolved.offset, resolved.function
            ),
            Err(e) => println!("  {:>6} -> ❌ {}", address, e),
        }
    }

    // =========================================================================
    // Part 2: Building request PDUs
    // =========================================================================
    println!("\n🔧 Part 2: Request PDUs");
    println!("------------------------");

    let requests = [
        RequestIns::read_holding_registers(0x006B, 3),
        RequestIns::write_single_coil(0x00AC, true),
        RequestIns::write_multiple_coils(
            0x0013,
            &[true, false, true, true, false, false, true, true, true, false],
        ),
        RequestIns::mask_write_register(0x0004, 0x00F2, 0x0025),
        PlcRequestIns::write(40010, Payload::Registers(vec![1, 2, 3]))
            .to_request(&config)?,
    ];
    for request in &requests {
        let pdu = PduBuilder::build_request(request)?;
        println!(
            "  {:<32} {}",
            ProtocolDataUnit::function_code_description(pdu.function_code()),
            hex(&pdu.to_bytes())
        );
    }

    let invalid_coil = RequestIns::new(ModbusFunction::WriteSingleCoil, 0x0000, 1)
        .with_payload(Payload::Value(0x1234));
    match PduBuilder::build_request(&invalid_coil) {
        Ok(_) => println!("  unexpected: coil value 0x1234 accepted"),
        Err(e) => println!("  FC05 with 0x1234 rejected: {}", e),
    }

    // =========================================================================
    // Part 3: Parsing responses
    // =========================================================================
    println!("\n📊 Part 3: Response Parsing");
    println!("----------------------------");

    let request = RequestIns::read_holding_registers(0x006B, 3);
    show(&request, &[0x03, 0x06, 0x02, 0x2B, 0x00, 0x00, 0x00, 0x64]);
    show(&request, &[0x83, 0x02]);
    show(&request, &[0x83, 0x06]);
    show(&request, &[0x04, 0x02, 0x00, 0x01]);

    println!("\n✅ Demo complete");
    Ok(())
}

fn show(request: &RequestIns, raw: &[u8]) {
    let outcome: ModbusResult<_> =
        ProtocolDataUnit::from_slice(raw).and_then(|pdu| parse_response(request, &pdu));
    match outcome {
        Ok(response) => println!("  {:<28} -> {:04X?}", hex(raw), response),
        Err(e) => println!(
            "  {:<28} -> ❌ {} [{:?}, retryable: {}]",
            hex(raw),
            e,
            e.kind(),
            e.is_retryable()
        ),
    }
}
