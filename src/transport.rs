//! Framing and transport capabilities
//!
//! The PDU layer is transport independent. Framing (MBAP header for TCP,
//! slave address + CRC for RTU, LRC for ASCII) is provided by a
//! [`Packager`]; moving bytes over a socket or serial line is provided by a
//! [`Transporter`]. Each transport supplies one type implementing each
//! trait.
//!
//! A physical link carries one request/response pair at a time. A
//! [`Transporter`] shared between callers must serialize exchanges itself;
//! [`GenericModbusClient`](crate::GenericModbusClient) does so by taking
//! `&mut self` for every exchange.
//!
//! Errors raised by implementations should be wrapped with
//! [`ModbusError::transport`](crate::ModbusError::transport) (or returned as
//! [`ModbusError::Io`](crate::ModbusError::Io)); the client passes them
//! through unchanged and never retries.

use std::future::Future;

use bytes::Bytes;

use crate::error::ModbusResult;
use crate::pdu::ProtocolDataUnit;

/// Wraps PDUs into ADUs and back.
pub trait Packager: Send {
    /// Frame a request PDU for the wire.
    fn encode(&mut self, pdu: &ProtocolDataUnit) -> ModbusResult<Bytes>;

    /// Strip framing from a response ADU.
    fn decode(&mut self, adu: &[u8]) -> ModbusResult<ProtocolDataUnit>;

    /// Reject a response ADU that does not answer `request_adu`
    /// (transaction id, unit id, slave address or checksum mismatch).
    fn verify(&self, request_adu: &[u8], response_adu: &[u8]) -> ModbusResult<()>;
}

/// Sends one request ADU and returns the matching response ADU.
///
/// Timeouts and reconnection are the implementation's concern. A transporter
/// that stops waiting reports [`ModbusError::timeout`](crate::ModbusError::timeout).
pub trait Transporter: Send {
    fn send(&mut self, request_adu: &[u8]) -> impl Future<Output = ModbusResult<Bytes>> + Send;
}
