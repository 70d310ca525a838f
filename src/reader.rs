use log::{debug, warn};

use crate::config::BridgeConfig;
use crate::transport::BusTransport;
use crate::types::{ReadOutcome, TAG_ID_LEN, TagId};

pub struct TagReader<B: BusTransport> {
    bus: B,
    address: u8,
    request: [u8; 2],
    timeout_ms: u32,
}

impl<B: BusTransport> TagReader<B> {
    /// Create a reader on `bus` with the default PN532 address and request
    pub fn new(bus: B) -> Self {
        Self::with_config(bus, &BridgeConfig::default())
    }

    pub fn with_config(bus: B, config: &BridgeConfig) -> Self {
        Self {
            bus,
            address: config.address,
            request: config.read_request,
            timeout_ms: config.bus_timeout_ms,
        }
    }

    /// Run one read cycle: send the request, then receive the identifier.
    ///
    /// A failed send short-circuits; the receive phase is never attempted.
    /// There is no retry here, callers poll again on their own schedule.
    pub fn attempt_read(&mut self) -> ReadOutcome {
        debug!("Sending read request {:02X?} to 0x{:02X}", self.request, self.address);
        if let Err(e) = self.bus.transmit(self.address, &self.request, self.timeout_ms) {
            warn!("Read request to 0x{:02X} failed: {:?}", self.address, e);
            return ReadOutcome::CommandFailed;
        }

        let mut uid = [0u8; TAG_ID_LEN];
        match self.bus.receive(self.address, &mut uid, self.timeout_ms) {
            Ok(()) => {
                debug!("Received {} bytes: {:02X?}", uid.len(), uid);
                ReadOutcome::Success(TagId::new(uid))
            }
            Err(e) => {
                warn!("Identifier read from 0x{:02X} failed: {:?}", self.address, e);
                ReadOutcome::ReadFailed
            }
        }
    }

    /// Give the bus back, e.g. to reuse it after shutdown
    pub fn release(self) -> B {
        self.bus
    }
}
