/// Two-wire bus connecting the controller to the tag sensor.
/// Implement this trait for each bus backend (ESP-IDF, embedded-hal, mocks).
///
/// Both calls must return within `timeout_ms`; an expired wait is reported
/// as an error, never as an indefinite block.
pub trait BusTransport {
    /// Error type for bus operations
    type Error: std::fmt::Debug;

    /// Write `data` to the device at the 7-bit `address`
    fn transmit(&mut self, address: u8, data: &[u8], timeout_ms: u32) -> Result<(), Self::Error>;

    /// Fill `buf` completely from the device at the 7-bit `address`
    fn receive(&mut self, address: u8, buf: &mut [u8], timeout_ms: u32) -> Result<(), Self::Error>;
}

/// Byte channel to the host computer (USB CDC, UART, serial port).
pub trait HostTransport {
    /// Error type for transport operations
    type Error: std::fmt::Debug;

    /// Write data to the host
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Read data from the host with a timeout in milliseconds.
    /// Returns `Ok(0)` when nothing arrived in time.
    fn read(&mut self, buf: &mut [u8], timeout_ms: u32) -> Result<usize, Self::Error>;
}
