//! Common test utilities and mock implementations

pub mod test_utils;

pub use mock_interface::{MockBus, MockError, Operation};
#[allow(unused_imports)]
pub use test_utils::{DEVICE_ADDRESS, config, i2c_register, spi_register};
