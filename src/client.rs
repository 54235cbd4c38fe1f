//! Modbus client
//!
//! [`GenericModbusClient`] drives one exchange end to end:
//!
//! ```text
//! Instruction ──resolve──▶ RequestIns ──build──▶ PDU ──encode──▶ ADU
//!                                                                  │ send
//! ModbusResponse ◀──parse── PDU ◀──decode── ADU ◀──verify──────────┘
//! ```
//!
//! Framing and I/O are supplied by the [`Packager`] and [`Transporter`]
//! type parameters, so the same client serves TCP, RTU and ASCII.
//!
//! # API Naming Convention
//!
//! | Function Code | Method |
//! |---------------|--------|
//! | 0x01 | `read_01()` |
//! | 0x02 | `read_02()` |
//! | 0x03 | `read_03()` |
//! | 0x04 | `read_04()` |
//! | 0x05 | `write_05()` |
//! | 0x06 | `write_06()` |
//! | 0x0F | `write_0f()` |
//! | 0x10 | `write_10()` |
//! | 0x16 | `mask_write_16()` |
//! | 0x17 | `read_write_17()` |
//! | 0x18 | `read_fifo_18()` |
//! | PLC | `plc_read()` / `plc_write()` |
//!
//! No retries happen here. Callers that want to poll again after a busy
//! device can check [`ModbusError::is_retryable`](crate::ModbusError::is_retryable).

use std::future::Future;

use tracing::{debug, trace, warn};

use crate::config::AddressingConfig;
use crate::error::ModbusResult;
use crate::instruction::{Instruction, Payload, PlcRequestIns, RequestIns};
use crate::pdu::PduBuilder;
use crate::response::{parse_response, ModbusResponse};
use crate::transport::{Packager, Transporter};

/// Modbus operations available on any client.
///
/// Only [`execute`](ModbusClient::execute) is required; every other method
/// builds an [`Instruction`] and routes it through it.
pub trait ModbusClient: Send {
    /// Run one instruction and return its typed response.
    fn execute(
        &mut self,
        instruction: Instruction,
    ) -> impl Future<Output = ModbusResult<ModbusResponse>> + Send;

    /// Read coils (function code 0x01).
    fn read_01(
        &mut self,
        address: u16,
        quantity: u16,
    ) -> impl Future<Output = ModbusResult<Vec<bool>>> + Send
    where
        Self: Sized,
    {
        async move {
            self.execute(RequestIns::read_coils(address, quantity).into())
                .await?
                .into_bits()
        }
    }

    /// Read discrete inputs (function code 0x02).
    fn read_02(
        &mut self,
        address: u16,
        quantity: u16,
    ) -> impl Future<Output = ModbusResult<Vec<bool>>> + Send
    where
        Self: Sized,
    {
        async move {
            self.execute(RequestIns::read_discrete_inputs(address, quantity).into())
                .await?
                .into_bits()
        }
    }

    /// Read holding registers (function code 0x03).
    fn read_03(
        &mut self,
        address: u16,
        quantity: u16,
    ) -> impl Future<Output = ModbusResult<Vec<u16>>> + Send
    where
        Self: Sized,
    {
        async move {
            self.execute(RequestIns::read_holding_registers(address, quantity).into())
                .await?
                .into_registers()
        }
    }

    /// Read input registers (function code 0x04).
    fn read_04(
        &mut self,
        address: u16,
        quantity: u16,
    ) -> impl Future<Output = ModbusResult<Vec<u16>>> + Send
    where
        Self: Sized,
    {
        async move {
            self.execute(RequestIns::read_input_registers(address, quantity).into())
                .await?
                .into_registers()
        }
    }

    /// Write single coil (function code 0x05).
    fn write_05(&mut self, address: u16, value: bool) -> impl Future<Output = ModbusResult<()>> + Send
    where
        Self: Sized,
    {
        async move {
            self.execute(RequestIns::write_single_coil(address, value).into())
                .await?;
            Ok(())
        }
    }

    /// Write single register (function code 0x06).
    fn write_06(&mut self, address: u16, value: u16) -> impl Future<Output = ModbusResult<()>> + Send
    where
        Self: Sized,
    {
        async move {
            self.execute(RequestIns::write_single_register(address, value).into())
                .await?;
            Ok(())
        }
    }

    /// Write multiple coils (function code 0x0F).
    fn write_0f(
        &mut self,
        address: u16,
        values: &[bool],
    ) -> impl Future<Output = ModbusResult<()>> + Send
    where
        Self: Sized,
    {
        let instruction = RequestIns::write_multiple_coils(address, values).into();
        async move {
            self.execute(instruction).await?;
            Ok(())
        }
    }

    /// Write multiple registers (function code 0x10).
    fn write_10(
        &mut self,
        address: u16,
        values: &[u16],
    ) -> impl Future<Output = ModbusResult<()>> + Send
    where
        Self: Sized,
    {
        let instruction = RequestIns::write_multiple_registers(address, values).into();
        async move {
            self.execute(instruction).await?;
            Ok(())
        }
    }

    /// Mask write register (function code 0x16).
    ///
    /// The device stores `(current AND and_mask) OR (or_mask AND NOT and_mask)`.
    fn mask_write_16(
        &mut self,
        address: u16,
        and_mask: u16,
        or_mask: u16,
    ) -> impl Future<Output = ModbusResult<()>> + Send
    where
        Self: Sized,
    {
        async move {
            self.execute(RequestIns::mask_write_register(address, and_mask, or_mask).into())
                .await?;
            Ok(())
        }
    }

    /// Read/write multiple registers (function code 0x17).
    ///
    /// The write is performed before the read.
    fn read_write_17(
        &mut self,
        read_address: u16,
        read_quantity: u16,
        write_address: u16,
        values: &[u16],
    ) -> impl Future<Output = ModbusResult<Vec<u16>>> + Send
    where
        Self: Sized,
    {
        let instruction = RequestIns::read_write_multiple_registers(
            read_address,
            read_quantity,
            write_address,
            values,
        )
        .into();
        async move { self.execute(instruction).await?.into_registers() }
    }

    /// Read FIFO queue (function code 0x18).
    fn read_fifo_18(&mut self, address: u16) -> impl Future<Output = ModbusResult<Vec<u16>>> + Send
    where
        Self: Sized,
    {
        async move {
            self.execute(RequestIns::read_fifo_queue(address).into())
                .await?
                .into_registers()
        }
    }

    /// Read using a Modicon address such as 40101 or 10001.
    fn plc_read(
        &mut self,
        address: u32,
        quantity: u16,
    ) -> impl Future<Output = ModbusResult<ModbusResponse>> + Send
    where
        Self: Sized,
    {
        self.execute(PlcRequestIns::read(address, quantity).into())
    }

    /// Write using a Modicon address; single or multiple write is chosen
    /// from the payload length.
    fn plc_write(
        &mut self,
        address: u32,
        payload: Payload,
    ) -> impl Future<Output = ModbusResult<ModbusResponse>> + Send
    where
        Self: Sized,
    {
        self.execute(PlcRequestIns::write(address, payload).into())
    }
}

/// Client generic over framing and transport.
pub struct GenericModbusClient<P, T> {
    packager: P,
    transporter: T,
    config: AddressingConfig,
}

impl<P: Packager, T: Transporter> GenericModbusClient<P, T> {
    /// Client with the extended register band unconfigured.
    pub fn new(packager: P, transporter: T) -> Self {
        Self::with_config(packager, transporter, AddressingConfig::default())
    }

    pub fn with_config(packager: P, transporter: T, config: AddressingConfig) -> Self {
        Self {
            packager,
            transporter,
            config,
        }
    }

    pub fn config(&self) -> &AddressingConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: AddressingConfig) {
        self.config = config;
    }

    pub fn packager(&self) -> &P {
        &self.packager
    }

    pub fn transporter(&self) -> &T {
        &self.transporter
    }

    pub fn transporter_mut(&mut self) -> &mut T {
        &mut self.transporter
    }

    /// Consume the client, returning its collaborators.
    pub fn into_parts(self) -> (P, T) {
        (self.packager, self.transporter)
    }

    /// Run a normal-style request that has already been resolved.
    pub async fn execute_request(&mut self, request: &RequestIns) -> ModbusResult<ModbusResponse> {
        let pdu = PduBuilder::build_request(request)?;
        let request_adu = self.packager.encode(&pdu)?;
        trace!("Request ADU: {:02X?}", request_adu.as_ref());

        let response_adu = self.transporter.send(&request_adu).await?;
        trace!("Response ADU: {:02X?}", response_adu.as_ref());

        if let Err(e) = self.packager.verify(&request_adu, &response_adu) {
            warn!("Response ADU does not match request: {}", e);
            return Err(e);
        }

        let response_pdu = self.packager.decode(&response_adu)?;
        let response = parse_response(request, &response_pdu)?;
        debug!(
            "Exchange complete: FC={:02X} addr={} len={}",
            pdu.function_code(),
            request.start_addr,
            request.data_length
        );
        Ok(response)
    }
}

impl<P, T> ModbusClient for GenericModbusClient<P, T>
where
    P: Packager,
    T: Transporter,
{
    async fn execute(&mut self, instruction: Instruction) -> ModbusResult<ModbusResponse> {
        let request = instruction.into_request(&self.config)?;
        self.execute_request(&request).await
    }
}

impl<P, T> std::fmt::Debug for GenericModbusClient<P, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenericModbusClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Returns an error if `instruction` would be rejected before transmission.
///
/// Useful for checking configuration files up front.
pub fn validate_instruction(
    instruction: &Instruction,
    config: &AddressingConfig,
) -> ModbusResult<()> {
    instruction.clone().into_request(config).map(|_| ())
}
