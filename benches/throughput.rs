//! Resolve, build and parse throughput

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use voltage_modbus_ins::{
    parse_response, resolve, AccessMode, AddressingConfig, PduBuilder, PlcRequestIns,
    ProtocolDataUnit, RequestIns,
};

fn register_response(count: u16) -> Vec<u8> {
    let mut raw = vec![0x03, (count * 2) as u8];
    for i in 0..count {
        raw.extend_from_slice(&i.to_be_bytes());
    }
    raw
}

fn benchmark_resolve(c: &mut Criterion) {
    let config = AddressingConfig::new();
    let mut group = c.benchmark_group("resolve");

    for address in [1u32, 10001, 30001, 40101, 465535] {
        group.bench_with_input(BenchmarkId::from_parameter(address), &address, |b, &address| {
            b.iter(|| resolve(black_box(address), AccessMode::Read, 1, &config).unwrap());
        });
    }

    group.finish();
}

fn benchmark_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");

    let read = RequestIns::read_holding_registers(0x006B, 125);
    group.bench_function("read_03", |b| {
        b.iter(|| PduBuilder::build_request(black_box(&read)).unwrap());
    });

    let values: Vec<u16> = (0..120).collect();
    let write = RequestIns::write_multiple_registers(0, &values);
    group.bench_function("write_10_x120", |b| {
        b.iter(|| PduBuilder::build_request(black_box(&write)).unwrap());
    });

    let coils: Vec<bool> = (0..2000).map(|i| i % 3 == 0).collect();
    let coil_write = RequestIns::write_multiple_coils(0, &coils);
    group.bench_function("write_0f_x2000", |b| {
        b.iter(|| PduBuilder::build_request(black_box(&coil_write)).unwrap());
    });

    let config = AddressingConfig::new();
    let plc = PlcRequestIns::read(40101, 10);
    group.bench_function("plc_read_resolve_and_build", |b| {
        b.iter(|| {
            let request = black_box(&plc).to_request(&config).unwrap();
            PduBuilder::build_request(&request).unwrap()
        });
    });

    group.finish();
}

fn benchmark_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for count in [1u16, 10, 64, 125] {
        let request = RequestIns::read_holding_registers(0, count);
        let raw = register_response(count);
        group.throughput(Throughput::Bytes(raw.len() as u64));
        group.bench_with_input(BenchmarkId::new("read_03", count), &raw, |b, raw| {
            b.iter(|| {
                let pdu = ProtocolDataUnit::from_slice(black_box(raw)).unwrap();
                parse_response(&request, &pdu).unwrap()
            });
        });
    }

    let request = RequestIns::read_coils(0, 2000);
    let mut raw = vec![0x01, 250];
    raw.extend(std::iter::repeat(0xA5).take(250));
    group.bench_function("read_01_x2000", |b| {
        b.iter(|| {
            let pdu = ProtocolDataUnit::from_slice(black_box(&raw)).unwrap();
            parse_response(&request, &pdu).unwrap()
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_resolve, benchmark_build, benchmark_parse);
criterion_main!(benches);
