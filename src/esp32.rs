//! I2C bus and UART host link for ESP32 using esp-idf-svc

use crate::transport::{BusTransport, HostTransport};
use esp_idf_svc::hal::delay::TickType;
use esp_idf_svc::hal::gpio::{self, InputPin, OutputPin};
use esp_idf_svc::hal::i2c::{self, I2cDriver};
use esp_idf_svc::hal::peripheral::Peripheral;
use esp_idf_svc::hal::uart::{self, UartDriver};
use esp_idf_svc::hal::units::Hertz;

fn ticks(timeout_ms: u32) -> u32 {
    TickType::new_millis(timeout_ms as u64).ticks()
}

pub struct EspI2cBus<'a> {
    i2c: I2cDriver<'a>,
}

impl<'a> EspI2cBus<'a> {
    /// Standard mode, 100 kHz
    pub const BAUD_RATE: Hertz = Hertz(100_000);

    pub fn new(
        i2c: impl Peripheral<P = impl i2c::I2c> + 'a,
        sda: impl Peripheral<P = impl InputPin + OutputPin> + 'a,
        scl: impl Peripheral<P = impl InputPin + OutputPin> + 'a,
    ) -> Result<Self, esp_idf_svc::sys::EspError> {
        let config = i2c::config::Config::new().baudrate(Self::BAUD_RATE);
        let i2c = I2cDriver::new(i2c, sda, scl, &config)?;

        Ok(Self { i2c })
    }
}

impl BusTransport for EspI2cBus<'_> {
    type Error = esp_idf_svc::sys::EspError;

    fn transmit(&mut self, address: u8, data: &[u8], timeout_ms: u32) -> Result<(), Self::Error> {
        self.i2c.write(address, data, ticks(timeout_ms))
    }

    fn receive(&mut self, address: u8, buf: &mut [u8], timeout_ms: u32) -> Result<(), Self::Error> {
        self.i2c.read(address, buf, ticks(timeout_ms))
    }
}

pub struct EspUartHost<'a> {
    uart: UartDriver<'a>,
}

impl<'a> EspUartHost<'a> {
    pub fn new(
        uart: impl Peripheral<P = impl uart::Uart> + 'a,
        tx: impl Peripheral<P = impl OutputPin> + 'a,
        rx: impl Peripheral<P = impl InputPin> + 'a,
        baud_rate: u32,
    ) -> Result<Self, esp_idf_svc::sys::EspError> {
        let config = uart::config::Config::default().baudrate(baud_rate.into());
        let uart = UartDriver::new(
            uart,
            tx,
            rx,
            Option::<gpio::Gpio0>::None,
            Option::<gpio::Gpio0>::None,
            &config,
        )?;
        uart.clear_rx()?;

        Ok(Self { uart })
    }
}

impl HostTransport for EspUartHost<'_> {
    type Error = esp_idf_svc::sys::EspError;

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        self.uart.write(data)
    }

    fn read(&mut self, buf: &mut [u8], timeout_ms: u32) -> Result<usize, Self::Error> {
        self.uart.read(buf, ticks(timeout_ms))
    }
}
