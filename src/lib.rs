#![no_std]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod bits;
pub mod frame;
pub mod interface;
pub mod register;

// Re-export main types
pub use bits::RegisterBits;
pub use frame::AddressFrame;
pub use interface::{Bus, BusError, FramedInterface, I2cInterface, SpiInterface, Transport};
pub use register::{Register, RegisterConfig};

#[cfg(feature = "async")]
pub use interface::AsyncTransport;

/// Value returned by [`Register::read_or_sentinel`] when the read fails
///
/// A register whose contents are all ones reads back as the same value, so
/// callers that need to tell the two apart should use [`Register::read`].
pub const READ_FAILED_SENTINEL: u32 = 0xFFFF_FFFF;

/// Widest value, in bytes, that integer reads and writes can handle
pub const MAX_INTEGER_WIDTH: u8 = 4;

/// Order in which the bytes of a multi-byte value appear on the bus
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ByteOrder {
    /// Least significant byte is transferred first
    #[default]
    LsbFirst,
    /// Most significant byte is transferred first
    MsbFirst,
}

/// Number of bytes used to frame a register address
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AddressWidth {
    /// Single address byte (addresses 0x00-0xFF)
    #[default]
    One = 1,
    /// Two address bytes, low byte first
    Two = 2,
}

impl AddressWidth {
    /// Number of bytes in the address frame
    pub const fn bytes(self) -> usize {
        self as usize
    }
}

/// SPI register addressing convention
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiRegisterType {
    /// Address bytes are sent unchanged
    #[default]
    Normal,
    /// Bit 7 of the first address byte is set for reads and cleared for writes
    AddrBit8HighToRead,
}

/// Physical bus behind a transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusType {
    /// I2C bus
    I2c,
    /// SPI bus
    Spi,
}

/// Register access errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Communication error on the underlying bus
    Bus(E),
    /// Integer access wider than [`MAX_INTEGER_WIDTH`] bytes (contains the requested width)
    InvalidWidth(u8),
    /// Bit field does not fit inside the register value
    InvalidField {
        /// Requested field width in bits
        bits: u8,
        /// Requested field offset in bits
        shift: u8,
    },
    /// Invalid register configuration parameter
    InvalidConfig,
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Self::Bus(error)
    }
}
