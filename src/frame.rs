//! Address framing and integer packing
//!
//! Everything in this module is pure byte arithmetic: no bus access happens
//! here. [`Register`](crate::Register) and [`FramedInterface`](crate::FramedInterface)
//! both build their wire format from these helpers, so the two always agree on
//! how an address and a value look on the bus.
//!
//! ## Address frame
//! The register address is always sent least significant byte first, using
//! one or two bytes depending on [`AddressWidth`]. The value byte order of the
//! register does not affect the address frame.
//!
//! ## SPI read/write bit
//! Many SPI register maps use bit 7 of the first address byte as a direction
//! flag: set for reads, clear for writes. With
//! [`SpiRegisterType::AddrBit8HighToRead`] the frame is adjusted accordingly.
//! On I2C the flag is never touched.

use crate::{AddressWidth, BusType, ByteOrder, SpiRegisterType};

/// Direction flag used by [`SpiRegisterType::AddrBit8HighToRead`]
pub const SPI_READ_BIT: u8 = 0x80;

/// Register address as it is sent on the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AddressFrame {
    bytes: [u8; 2],
    len: usize,
}

impl AddressFrame {
    /// Frame `address` into `width` bytes, low byte first
    ///
    /// With [`AddressWidth::One`] the high byte of `address` is dropped.
    pub const fn new(address: u16, width: AddressWidth) -> Self {
        Self {
            bytes: address.to_le_bytes(),
            len: width.bytes(),
        }
    }

    /// Frame for a write transfer
    ///
    /// Clears the SPI read bit when the bus is SPI and the register uses
    /// [`SpiRegisterType::AddrBit8HighToRead`].
    pub const fn for_write(
        address: u16,
        width: AddressWidth,
        bus: BusType,
        spi_type: SpiRegisterType,
    ) -> Self {
        let mut frame = Self::new(address, width);
        if uses_read_bit(bus, spi_type) {
            frame.bytes[0] &= !SPI_READ_BIT;
        }
        frame
    }

    /// Frame for a write-then-read transfer
    ///
    /// Sets the SPI read bit when the bus is SPI and the register uses
    /// [`SpiRegisterType::AddrBit8HighToRead`].
    pub const fn for_read(
        address: u16,
        width: AddressWidth,
        bus: BusType,
        spi_type: SpiRegisterType,
    ) -> Self {
        let mut frame = Self::new(address, width);
        if uses_read_bit(bus, spi_type) {
            frame.bytes[0] |= SPI_READ_BIT;
        }
        frame
    }

    /// The framed address bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Number of bytes in the frame
    pub const fn len(&self) -> usize {
        self.len
    }
}

const fn uses_read_bit(bus: BusType, spi_type: SpiRegisterType) -> bool {
    matches!(
        (bus, spi_type),
        (BusType::Spi, SpiRegisterType::AddrBit8HighToRead)
    )
}

/// Pack the low `out.len()` bytes of `value` into `out`
///
/// `out` must not be longer than four bytes; any extra bytes are zero-filled.
pub fn pack(mut value: u32, order: ByteOrder, out: &mut [u8]) {
    let mut emit = |byte: &mut u8| {
        *byte = (value & 0xFF) as u8;
        value >>= 8;
    };
    match order {
        ByteOrder::LsbFirst => out.iter_mut().for_each(&mut emit),
        ByteOrder::MsbFirst => out.iter_mut().rev().for_each(&mut emit),
    }
}

/// Rebuild an unsigned value from `bytes` (inverse of [`pack`])
///
/// Only the four least significant bytes survive when `bytes` is longer.
pub fn unpack(order: ByteOrder, bytes: &[u8]) -> u32 {
    let shift_in = |value: u32, byte: &u8| (value << 8) | u32::from(*byte);
    match order {
        ByteOrder::LsbFirst => bytes.iter().rev().fold(0, shift_in),
        ByteOrder::MsbFirst => bytes.iter().fold(0, shift_in),
    }
}
