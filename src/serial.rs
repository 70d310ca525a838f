//! Host link over a serial port (USB CDC, gadget serial, FTDI) using the serialport crate

use crate::transport::HostTransport;
use std::io::ErrorKind;
use std::time::Duration;

pub struct SerialHost {
    port: Box<dyn serialport::SerialPort>,
}

impl SerialHost {
    pub fn new(port_name: &str, baud_rate: u32) -> Result<Self, serialport::Error> {
        let port = serialport::new(port_name, baud_rate)
            .timeout(Duration::from_secs(1))
            .open()?;
        port.clear(serialport::ClearBuffer::Input)?;

        Ok(Self { port })
    }

    /// Second handle on the same port, so commands can be read on one
    /// thread while reports are written on another
    pub fn try_clone(&self) -> Result<Self, serialport::Error> {
        Ok(Self {
            port: self.port.try_clone()?,
        })
    }
}

impl HostTransport for SerialHost {
    type Error = std::io::Error;

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        std::io::Write::write(&mut self.port, data)
    }

    fn read(&mut self, buf: &mut [u8], timeout_ms: u32) -> Result<usize, Self::Error> {
        self.port
            .set_timeout(Duration::from_millis(timeout_ms as u64))
            .map_err(std::io::Error::other)?;
        match std::io::Read::read(&mut self.port, buf) {
            Err(e) if e.kind() == ErrorKind::TimedOut => Ok(0),
            other => other,
        }
    }
}
