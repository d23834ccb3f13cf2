//! Whole-register access
//!
//! A [`Register`] pairs a transport with an address and a [`RegisterConfig`].
//! It converts between a logical `u32` and the bytes on the bus, and offers
//! raw buffer transfers for registers wider than four bytes or block data.
//!
//! # Example
//!
//! ```ignore
//! # use bus_register::{ByteOrder, I2cInterface, Register, RegisterConfig};
//! # let i2c = todo!();
//! let config = RegisterConfig::new(2, ByteOrder::MsbFirst)?;
//! let mut threshold = Register::new(I2cInterface::new(i2c, 0x48), 0x03, config);
//!
//! threshold.write(0x1234)?; // sends [0x03, 0x12, 0x34]
//! let value = threshold.read()?;
//! # Ok::<(), bus_register::Error<()>>(())
//! ```
//!
//! With the `async` feature enabled every bus operation becomes an `async fn`
//! over [`AsyncTransport`](crate::AsyncTransport) instead of [`Transport`](crate::Transport).

use core::fmt::Write;

use crate::frame::{self, AddressFrame};
use crate::{
    AddressWidth, ByteOrder, Error, MAX_INTEGER_WIDTH, READ_FAILED_SENTINEL, SpiRegisterType,
};

#[cfg(not(feature = "async"))]
use crate::Transport;

#[cfg(feature = "async")]
use crate::AsyncTransport;

use crate::bits::RegisterBits;

/// Register layout and addressing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterConfig {
    /// Bytes per logical value (1-4 for integer access, any size for raw buffers)
    pub width: u8,
    /// Order of the value bytes on the bus
    pub byte_order: ByteOrder,
    /// Number of address bytes sent before the payload
    pub address_width: AddressWidth,
    /// SPI read/write address convention (ignored on I2C)
    pub spi_type: SpiRegisterType,
}

impl Default for RegisterConfig {
    fn default() -> Self {
        Self {
            width: 1,
            byte_order: ByteOrder::LsbFirst,
            address_width: AddressWidth::One,
            spi_type: SpiRegisterType::Normal,
        }
    }
}

impl RegisterConfig {
    /// Create a configuration with a 1-byte address and normal SPI addressing
    ///
    /// # Arguments
    /// * `width` - Bytes per value (must be at least 1)
    /// * `byte_order` - Order of the value bytes on the bus
    ///
    /// # Errors
    /// Returns `InvalidConfig` if `width` is zero
    pub const fn new(width: u8, byte_order: ByteOrder) -> Result<Self, Error<()>> {
        if width == 0 {
            return Err(Error::InvalidConfig);
        }
        Ok(Self {
            width,
            byte_order,
            address_width: AddressWidth::One,
            spi_type: SpiRegisterType::Normal,
        })
    }

    /// Use `address_width` address bytes
    pub const fn with_address_width(mut self, address_width: AddressWidth) -> Self {
        self.address_width = address_width;
        self
    }

    /// Use the given SPI addressing convention
    pub const fn with_spi_type(mut self, spi_type: SpiRegisterType) -> Self {
        self.spi_type = spi_type;
        self
    }
}

/// One addressable register on an I2C or SPI device
pub struct Register<T> {
    transport: T,
    address: u16,
    config: RegisterConfig,
}

impl<T> Register<T> {
    /// Create a register at `address` on `transport`
    ///
    /// Pass `&mut transport` to share one transport between several registers.
    pub const fn new(transport: T, address: u16, config: RegisterConfig) -> Self {
        Self {
            transport,
            address,
            config,
        }
    }

    /// Register address
    pub const fn address(&self) -> u16 {
        self.address
    }

    /// Bytes per logical value
    pub const fn width(&self) -> u8 {
        self.config.width
    }

    /// Value byte order
    pub const fn byte_order(&self) -> ByteOrder {
        self.config.byte_order
    }

    /// Address frame width
    pub const fn address_width(&self) -> AddressWidth {
        self.config.address_width
    }

    /// SPI addressing convention
    pub const fn spi_type(&self) -> SpiRegisterType {
        self.config.spi_type
    }

    /// Full register configuration
    pub const fn config(&self) -> &RegisterConfig {
        &self.config
    }

    /// Mutable access to the underlying transport
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consume the register and return the transport
    pub fn release(self) -> T {
        self.transport
    }

    /// Span in bytes of an integer access (`0` selects the register width)
    const fn integer_span(&self, num_bytes: u8) -> u8 {
        if num_bytes == 0 {
            self.config.width
        } else {
            num_bytes
        }
    }

    fn invalid_width<E>(&self, num_bytes: u8) -> Error<E> {
        #[cfg(feature = "defmt")]
        defmt::warn!(
            "register {=u16:#x}: integer access of {} bytes exceeds {} bytes",
            self.address,
            num_bytes,
            MAX_INTEGER_WIDTH
        );

        Error::InvalidWidth(num_bytes)
    }

    fn fail_sentinel<E>(&self, error: &Error<E>) -> u32 {
        let _ = error;
        #[cfg(feature = "defmt")]
        defmt::warn!(
            "register {=u16:#x}: read failed, returning sentinel",
            self.address
        );

        READ_FAILED_SENTINEL
    }

    fn unpack_u16(&self, buffer: [u8; 2]) -> u16 {
        match self.config.byte_order {
            ByteOrder::LsbFirst => u16::from_le_bytes(buffer),
            ByteOrder::MsbFirst => u16::from_be_bytes(buffer),
        }
    }
}

#[cfg(not(feature = "async"))]
impl<T: Transport> Register<T> {
    fn write_frame(&self) -> AddressFrame {
        AddressFrame::for_write(
            self.address,
            self.config.address_width,
            self.transport.bus_type(),
            self.config.spi_type,
        )
    }

    fn read_frame(&self) -> AddressFrame {
        AddressFrame::for_read(
            self.address,
            self.config.address_width,
            self.transport.bus_type(),
            self.config.spi_type,
        )
    }

    /// Write `value` using the register width
    ///
    /// # Errors
    ///
    /// Returns an error if the register is wider than four bytes or the
    /// transport fails.
    pub fn write(&mut self, value: u32) -> Result<(), Error<T::Error>> {
        self.write_sized(value, 0)
    }

    /// Write the low `num_bytes` bytes of `value`
    ///
    /// `num_bytes == 0` uses the register width. Bytes are packed in the
    /// register byte order.
    ///
    /// # Errors
    ///
    /// Returns `InvalidWidth` without touching the bus if `num_bytes` exceeds
    /// four, or `Bus` if the transport fails.
    pub fn write_sized(&mut self, value: u32, num_bytes: u8) -> Result<(), Error<T::Error>> {
        let num_bytes = self.integer_span(num_bytes);
        if num_bytes > MAX_INTEGER_WIDTH {
            return Err(self.invalid_width(num_bytes));
        }

        let mut buffer = [0u8; MAX_INTEGER_WIDTH as usize];
        let bytes = &mut buffer[..usize::from(num_bytes)];
        frame::pack(value, self.config.byte_order, bytes);
        self.write_buffer(bytes)
    }

    /// Send the address frame followed by `data` in one write transaction
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails. Nothing is retried.
    pub fn write_buffer(&mut self, data: &[u8]) -> Result<(), Error<T::Error>> {
        let frame = self.write_frame();

        #[cfg(feature = "defmt")]
        defmt::trace!(
            "register {=u16:#x}: write {=[u8]:#x}",
            self.address,
            data
        );

        self.transport.write(frame.as_bytes(), data)?;
        Ok(())
    }

    /// Read the register value
    ///
    /// # Errors
    ///
    /// Returns `InvalidWidth` if the register is wider than four bytes, or
    /// `Bus` if the transport fails.
    pub fn read(&mut self) -> Result<u32, Error<T::Error>> {
        let width = self.config.width;
        if width > MAX_INTEGER_WIDTH {
            return Err(self.invalid_width(width));
        }

        let mut buffer = [0u8; MAX_INTEGER_WIDTH as usize];
        let bytes = &mut buffer[..usize::from(width)];
        self.read_buffer(bytes)?;
        Ok(frame::unpack(self.config.byte_order, bytes))
    }

    /// Read the register value, returning [`READ_FAILED_SENTINEL`] on any failure
    ///
    /// A register that really holds all ones is indistinguishable from a
    /// failed read. Prefer [`read`](Self::read).
    pub fn read_or_sentinel(&mut self) -> u32 {
        match self.read() {
            Ok(value) => value,
            Err(error) => self.fail_sentinel(&error),
        }
    }

    /// Send the address frame, then fill `buffer` from the device
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails.
    pub fn read_buffer(&mut self, buffer: &mut [u8]) -> Result<(), Error<T::Error>> {
        let frame = self.read_frame();
        self.transport.write_then_read(frame.as_bytes(), buffer)?;

        #[cfg(feature = "defmt")]
        defmt::trace!(
            "register {=u16:#x}: read {=[u8]:#x}",
            self.address,
            buffer
        );

        Ok(())
    }

    /// Read two bytes as a `u16` in the register byte order
    ///
    /// Always transfers two bytes, whatever the register width.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails.
    pub fn read_u16(&mut self) -> Result<u16, Error<T::Error>> {
        let mut buffer = [0u8; 2];
        self.read_buffer(&mut buffer)?;
        Ok(self.unpack_u16(buffer))
    }

    /// Read a single byte
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails.
    pub fn read_u8(&mut self) -> Result<u8, Error<T::Error>> {
        let mut buffer = [0u8; 1];
        self.read_buffer(&mut buffer)?;
        Ok(buffer[0])
    }

    /// Bit field view of `bits` bits starting at bit `shift`
    ///
    /// # Errors
    ///
    /// Returns `InvalidField` if the field does not fit in the register value.
    pub fn bits(&mut self, bits: u8, shift: u8) -> Result<RegisterBits<'_, T>, Error<T::Error>> {
        RegisterBits::new(self, bits, shift)
    }

    /// Write the current value as `0x` followed by uppercase hex digits
    ///
    /// A failed read prints the sentinel value.
    pub fn print<W: Write>(&mut self, out: &mut W) -> core::fmt::Result {
        let value = self.read_or_sentinel();
        write!(out, "0x{value:X}")
    }

    /// Same as [`print`](Self::print), followed by a newline
    pub fn println<W: Write>(&mut self, out: &mut W) -> core::fmt::Result {
        self.print(out)?;
        writeln!(out)
    }
}

#[cfg(feature = "async")]
impl<T: AsyncTransport> Register<T> {
    fn write_frame(&self) -> AddressFrame {
        AddressFrame::for_write(
            self.address,
            self.config.address_width,
            self.transport.bus_type(),
            self.config.spi_type,
        )
    }

    fn read_frame(&self) -> AddressFrame {
        AddressFrame::for_read(
            self.address,
            self.config.address_width,
            self.transport.bus_type(),
            self.config.spi_type,
        )
    }

    /// Write `value` using the register width
    ///
    /// # Errors
    ///
    /// Returns an error if the register is wider than four bytes or the
    /// transport fails.
    pub async fn write(&mut self, value: u32) -> Result<(), Error<T::Error>> {
        self.write_sized(value, 0).await
    }

    /// Write the low `num_bytes` bytes of `value`
    ///
    /// `num_bytes == 0` uses the register width.
    ///
    /// # Errors
    ///
    /// Returns `InvalidWidth` without touching the bus if `num_bytes` exceeds
    /// four, or `Bus` if the transport fails.
    pub async fn write_sized(&mut self, value: u32, num_bytes: u8) -> Result<(), Error<T::Error>> {
        let num_bytes = self.integer_span(num_bytes);
        if num_bytes > MAX_INTEGER_WIDTH {
            return Err(self.invalid_width(num_bytes));
        }

        let mut buffer = [0u8; MAX_INTEGER_WIDTH as usize];
        let bytes = &mut buffer[..usize::from(num_bytes)];
        frame::pack(value, self.config.byte_order, bytes);
        self.write_buffer(bytes).await
    }

    /// Send the address frame followed by `data` in one write transaction
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails. Nothing is retried.
    pub async fn write_buffer(&mut self, data: &[u8]) -> Result<(), Error<T::Error>> {
        let frame = self.write_frame();

        #[cfg(feature = "defmt")]
        defmt::trace!(
            "register {=u16:#x}: write {=[u8]:#x}",
            self.address,
            data
        );

        self.transport.write(frame.as_bytes(), data).await?;
        Ok(())
    }

    /// Read the register value
    ///
    /// # Errors
    ///
    /// Returns `InvalidWidth` if the register is wider than four bytes, or
    /// `Bus` if the transport fails.
    pub async fn read(&mut self) -> Result<u32, Error<T::Error>> {
        let width = self.config.width;
        if width > MAX_INTEGER_WIDTH {
            return Err(self.invalid_width(width));
        }

        let mut buffer = [0u8; MAX_INTEGER_WIDTH as usize];
        let bytes = &mut buffer[..usize::from(width)];
        self.read_buffer(bytes).await?;
        Ok(frame::unpack(self.config.byte_order, bytes))
    }

    /// Read the register value, returning [`READ_FAILED_SENTINEL`] on any failure
    pub async fn read_or_sentinel(&mut self) -> u32 {
        match self.read().await {
            Ok(value) => value,
            Err(error) => self.fail_sentinel(&error),
        }
    }

    /// Send the address frame, then fill `buffer` from the device
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails.
    pub async fn read_buffer(&mut self, buffer: &mut [u8]) -> Result<(), Error<T::Error>> {
        let frame = self.read_frame();
        self.transport
            .write_then_read(frame.as_bytes(), buffer)
            .await?;

        #[cfg(feature = "defmt")]
        defmt::trace!(
            "register {=u16:#x}: read {=[u8]:#x}",
            self.address,
            buffer
        );

        Ok(())
    }

    /// Read two bytes as a `u16` in the register byte order
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails.
    pub async fn read_u16(&mut self) -> Result<u16, Error<T::Error>> {
        let mut buffer = [0u8; 2];
        self.read_buffer(&mut buffer).await?;
        Ok(self.unpack_u16(buffer))
    }

    /// Read a single byte
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails.
    pub async fn read_u8(&mut self) -> Result<u8, Error<T::Error>> {
        let mut buffer = [0u8; 1];
        self.read_buffer(&mut buffer).await?;
        Ok(buffer[0])
    }

    /// Bit field view of `bits` bits starting at bit `shift`
    ///
    /// # Errors
    ///
    /// Returns `InvalidField` if the field does not fit in the register value.
    pub fn bits(&mut self, bits: u8, shift: u8) -> Result<RegisterBits<'_, T>, Error<T::Error>> {
        RegisterBits::new(self, bits, shift)
    }

    /// Write the current value as `0x` followed by uppercase hex digits
    pub async fn print<W: Write>(&mut self, out: &mut W) -> core::fmt::Result {
        let value = self.read_or_sentinel().await;
        write!(out, "0x{value:X}")
    }

    /// Same as [`print`](Self::print), followed by a newline
    pub async fn println<W: Write>(&mut self, out: &mut W) -> core::fmt::Result {
        self.print(out).await?;
        writeln!(out)
    }
}
