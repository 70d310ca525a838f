//! Tag reader daemon for Linux boards: PN532 on an I2C adapter, host on a serial port.
//!
//! Device paths come from `RFID_I2C_BUS` and `RFID_HOST_PORT`; log level from `RUST_LOG`.

use std::env;
use std::process;

use linux_embedded_hal::I2cdev;
use log::{error, info};
use rfid_bridge::{BridgeConfig, BridgeError, HalBus, RfidBridge, SerialHost, Service};

const DEFAULT_I2C_BUS: &str = "/dev/i2c-1";
const DEFAULT_HOST_PORT: &str = "/dev/ttyGS0";
const HOST_BAUD_RATE: u32 = 115_200;

fn main() {
    env_logger::init();

    // Running on a half-configured bus could corrupt later transactions, so
    // any bring-up failure stops here.
    if let Err(e) = run() {
        error!("{}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), BridgeError> {
    let i2c_path = env::var("RFID_I2C_BUS").unwrap_or_else(|_| DEFAULT_I2C_BUS.to_string());
    let port_path = env::var("RFID_HOST_PORT").unwrap_or_else(|_| DEFAULT_HOST_PORT.to_string());
    let config = BridgeConfig::default();

    let i2c = I2cdev::new(&i2c_path)
        .map_err(|e| BridgeError::Init(format!("{}: {:?}", i2c_path, e)))?;
    let host = SerialHost::new(&port_path, HOST_BAUD_RATE)
        .map_err(|e| BridgeError::Init(format!("{}: {:?}", port_path, e)))?;
    let mut inbound = host
        .try_clone()
        .map_err(|e| BridgeError::Init(format!("{}: {:?}", port_path, e)))?;

    let bridge = RfidBridge::new(HalBus::new(i2c), host, &config)?;
    let service = Service::spawn(bridge, config.poll_interval)?;
    info!("Reading tags on {}, reporting to {}", i2c_path, port_path);

    // Returns only once the host link fails.
    let result = service.commands().pump(&mut inbound);
    service.shutdown()?.shutdown();
    result
}
