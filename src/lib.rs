//! Bridge between an I2C contactless tag sensor and a host computer.
//!
//! A read cycle writes a short request to the sensor, reads back a 7-byte
//! tag identifier and sends one line of text to the host. Cycles are started
//! by a periodic tick or by the host sending `READ_RFID`.
//!
//! # Features
//!
//! - `serial` - Host link over a serial port using the serialport crate
//! - `embedded-hal` - Sensor bus over any `embedded_hal::i2c::I2c`
//! - `esp32` - I2C bus and UART host link for ESP32 using esp-idf-svc
//! - `daemon` - The `rfid-bridge` binary for Linux boards
//!
//! # Example
//!
//! ```ignore
//! use rfid_bridge::{BridgeConfig, HalBus, RfidBridge, SerialHost, Service};
//!
//! let config = BridgeConfig::default();
//! let host = SerialHost::new("/dev/ttyGS0", 115200)?;
//! let mut inbound = host.try_clone()?;
//! let bus = HalBus::new(linux_embedded_hal::I2cdev::new("/dev/i2c-1")?);
//!
//! let bridge = RfidBridge::new(bus, host, &config)?;
//! let service = Service::spawn(bridge, config.poll_interval)?;
//! service.commands().pump(&mut inbound)?;
//! ```

mod bridge;
mod config;
mod dispatcher;
mod reader;
mod report;
mod service;
mod transport;
mod types;

#[cfg(feature = "embedded-hal")]
mod hal;

#[cfg(feature = "esp32")]
mod esp32;

#[cfg(feature = "serial")]
mod serial;

// Re-exports
pub use bridge::RfidBridge;
pub use config::BridgeConfig;
pub use dispatcher::CommandDispatcher;
pub use reader::TagReader;
pub use report::{
    COMMAND_FAILED, LINE_END, READ_FAILED, REPORT_CAPACITY, Report, Reporter, TAG_LABEL,
    UNKNOWN_COMMAND, format_outcome, unknown_command,
};
pub use service::{CommandHandle, PollState, Poller, Service};
pub use transport::{BusTransport, HostTransport};
pub use types::{BridgeError, Effect, HostCommand, MAX_COMMAND_LEN, ReadOutcome, TAG_ID_LEN, TagId};

#[cfg(feature = "embedded-hal")]
pub use hal::HalBus;

#[cfg(feature = "esp32")]
pub use esp32::{EspI2cBus, EspUartHost};

#[cfg(feature = "serial")]
pub use serial::SerialHost;
