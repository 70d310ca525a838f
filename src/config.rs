//! Bridge configuration

use std::time::Duration;

/// Tunables for the reader, the dispatcher and the polling service
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// 7-bit bus address of the sensor
    pub address: u8,
    /// Request written to the sensor to start a read cycle
    pub read_request: [u8; 2],
    /// Upper bound for each bus transaction in milliseconds
    pub bus_timeout_ms: u32,
    /// Period of the polling tick
    pub poll_interval: Duration,
    /// The one command token that triggers a read
    pub command_token: &'static str,
    /// Reports buffered for the host before new ones are dropped
    pub report_queue_depth: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            address: Self::PN532_ADDRESS,
            read_request: [0x02, 0x01],
            bus_timeout_ms: 100,
            poll_interval: Duration::from_millis(500),
            command_token: "READ_RFID",
            report_queue_depth: 16,
        }
    }
}

impl BridgeConfig {
    /// PN532 address on I2C (0x48 in the shifted 8-bit notation)
    pub const PN532_ADDRESS: u8 = 0x24;

    pub fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    pub fn with_read_request(mut self, request: [u8; 2]) -> Self {
        self.read_request = request;
        self
    }

    pub fn with_bus_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.bus_timeout_ms = timeout_ms;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_command_token(mut self, token: &'static str) -> Self {
        self.command_token = token;
        self
    }

    pub fn with_report_queue_depth(mut self, depth: usize) -> Self {
        self.report_queue_depth = depth.max(1);
        self
    }
}
