//! Test utilities and helper functions

use crate::common::mock_interface::{MockBus, MockI2c, MockSpi};
use bus_register::{ByteOrder, I2cInterface, Register, RegisterConfig, SpiInterface};

/// I2C address used by the mock device
pub const DEVICE_ADDRESS: u8 = 0x48;

/// Create a register configuration, panicking on invalid input
pub fn config(width: u8, byte_order: ByteOrder) -> RegisterConfig {
    RegisterConfig::new(width, byte_order).expect("Invalid register configuration")
}

/// Create a register on the mock I2C device
#[allow(dead_code)]
pub fn i2c_register(
    bus: &MockBus,
    address: u16,
    config: RegisterConfig,
) -> Register<I2cInterface<MockI2c>> {
    Register::new(
        I2cInterface::new(bus.i2c(DEVICE_ADDRESS), DEVICE_ADDRESS),
        address,
        config,
    )
}

/// Create a register on the mock SPI device
#[allow(dead_code)]
pub fn spi_register(
    bus: &MockBus,
    address: u16,
    config: RegisterConfig,
) -> Register<SpiInterface<MockSpi>> {
    Register::new(SpiInterface::new(bus.spi()), address, config)
}
