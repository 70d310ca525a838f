//! Bus transport for any `embedded_hal::i2c::I2c` implementation

use embedded_hal::i2c::I2c;

use crate::transport::BusTransport;

/// Adapts an embedded-hal I2C bus to [`BusTransport`].
///
/// embedded-hal has no per-call timeout, so the wait bound is whatever the
/// underlying implementation enforces (the kernel adapter timeout for
/// `linux-embedded-hal`, the peripheral timeout on MCU HALs).
pub struct HalBus<I> {
    i2c: I,
}

impl<I: I2c> HalBus<I> {
    pub fn new(i2c: I) -> Self {
        Self { i2c }
    }

    pub fn release(self) -> I {
        self.i2c
    }
}

impl<I: I2c> BusTransport for HalBus<I> {
    type Error = I::Error;

    fn transmit(&mut self, address: u8, data: &[u8], _timeout_ms: u32) -> Result<(), Self::Error> {
        self.i2c.write(address, data)
    }

    fn receive(&mut self, address: u8, buf: &mut [u8], _timeout_ms: u32) -> Result<(), Self::Error> {
        self.i2c.read(address, buf)
    }
}
