//! Bus transports for register access
//!
//! A [`Transport`] moves pre-framed bytes: it never builds addresses itself.
//! [`I2cInterface`] and [`SpiInterface`] implement it on top of the
//! `embedded-hal` 1.0 bus traits, [`Bus`] selects one of them at runtime, and
//! [`FramedInterface`] exposes the same framing to register maps generated by
//! `device-driver`.

use crate::frame::AddressFrame;
use crate::{AddressWidth, BusType, SpiRegisterType};

/// Byte-level transport used by [`Register`](crate::Register)
///
/// Implementations send `address` and the payload back to back in a single
/// bus transaction. They must not retry on failure.
pub trait Transport {
    /// Bus error type
    type Error;

    /// Which physical bus this transport drives
    fn bus_type(&self) -> BusType;

    /// Write the address frame followed by `payload` as one transaction
    fn write(&mut self, address: &[u8], payload: &[u8]) -> Result<(), Self::Error>;

    /// Write the address frame, then fill `read` from the device
    fn write_then_read(&mut self, address: &[u8], read: &mut [u8]) -> Result<(), Self::Error>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    type Error = T::Error;

    fn bus_type(&self) -> BusType {
        (**self).bus_type()
    }

    fn write(&mut self, address: &[u8], payload: &[u8]) -> Result<(), Self::Error> {
        (**self).write(address, payload)
    }

    fn write_then_read(&mut self, address: &[u8], read: &mut [u8]) -> Result<(), Self::Error> {
        (**self).write_then_read(address, read)
    }
}

/// Async counterpart of [`Transport`]
#[cfg(feature = "async")]
#[allow(async_fn_in_trait)]
pub trait AsyncTransport {
    /// Bus error type
    type Error;

    /// Which physical bus this transport drives
    fn bus_type(&self) -> BusType;

    /// Write the address frame followed by `payload` as one transaction
    async fn write(&mut self, address: &[u8], payload: &[u8]) -> Result<(), Self::Error>;

    /// Write the address frame, then fill `read` from the device
    async fn write_then_read(
        &mut self,
        address: &[u8],
        read: &mut [u8],
    ) -> Result<(), Self::Error>;
}

#[cfg(feature = "async")]
impl<T: AsyncTransport + ?Sized> AsyncTransport for &mut T {
    type Error = T::Error;

    fn bus_type(&self) -> BusType {
        (**self).bus_type()
    }

    async fn write(&mut self, address: &[u8], payload: &[u8]) -> Result<(), Self::Error> {
        (**self).write(address, payload).await
    }

    async fn write_then_read(
        &mut self,
        address: &[u8],
        read: &mut [u8],
    ) -> Result<(), Self::Error> {
        (**self).write_then_read(address, read).await
    }
}

/// I2C transport for a single target device
pub struct I2cInterface<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> I2cInterface<I2C> {
    /// Create a new I2C interface for the device at `address` (7-bit)
    ///
    /// # Arguments
    /// * `i2c` - The I2C peripheral
    /// * `address` - The I2C device address
    ///
    /// # Example
    /// ```ignore
    /// let interface = I2cInterface::new(i2c, 0x6B);
    /// let mut ctrl = Register::new(interface, 0x10, RegisterConfig::default());
    /// ```
    pub const fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// I2C address of the target device
    pub const fn device_address(&self) -> u8 {
        self.address
    }

    /// Consume the interface and return the I2C peripheral
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C, E> Transport for I2cInterface<I2C>
where
    I2C: embedded_hal::i2c::I2c<Error = E>,
{
    type Error = E;

    fn bus_type(&self) -> BusType {
        BusType::I2c
    }

    fn write(&mut self, address: &[u8], payload: &[u8]) -> Result<(), Self::Error> {
        // Adjacent writes are sent without a repeated start
        let mut operations = [
            embedded_hal::i2c::Operation::Write(address),
            embedded_hal::i2c::Operation::Write(payload),
        ];
        self.i2c.transaction(self.address, &mut operations)
    }

    fn write_then_read(&mut self, address: &[u8], read: &mut [u8]) -> Result<(), Self::Error> {
        self.i2c.write_read(self.address, address, read)
    }
}

#[cfg(feature = "async")]
impl<I2C, E> AsyncTransport for I2cInterface<I2C>
where
    I2C: embedded_hal_async::i2c::I2c<Error = E>,
{
    type Error = E;

    fn bus_type(&self) -> BusType {
        BusType::I2c
    }

    async fn write(&mut self, address: &[u8], payload: &[u8]) -> Result<(), Self::Error> {
        let mut operations = [
            embedded_hal_async::i2c::Operation::Write(address),
            embedded_hal_async::i2c::Operation::Write(payload),
        ];
        self.i2c.transaction(self.address, &mut operations).await
    }

    async fn write_then_read(
        &mut self,
        address: &[u8],
        read: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.i2c.write_read(self.address, address, read).await
    }
}

/// SPI transport
///
/// # Note on Chip Select
///
/// This interface uses the `SpiDevice` trait from `embedded-hal`, which manages
/// the chip select (CS) pin automatically. Address and payload are sent inside
/// one CS assertion.
///
/// If using `embedded-hal-bus`, you would typically create an `SpiDevice` like:
/// ```ignore
/// let spi_device = embedded_hal_bus::spi::ExclusiveDevice::new(spi_bus, cs_pin, delay);
/// let interface = SpiInterface::new(spi_device);
/// ```
pub struct SpiInterface<SPI> {
    spi: SPI,
}

impl<SPI> SpiInterface<SPI> {
    /// Create a new SPI interface with the given SPI device
    pub const fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Consume the interface and return the SPI device
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI, E> Transport for SpiInterface<SPI>
where
    SPI: embedded_hal::spi::SpiDevice<Error = E>,
{
    type Error = E;

    fn bus_type(&self) -> BusType {
        BusType::Spi
    }

    fn write(&mut self, address: &[u8], payload: &[u8]) -> Result<(), Self::Error> {
        let mut operations = [
            embedded_hal::spi::Operation::Write(address),
            embedded_hal::spi::Operation::Write(payload),
        ];
        self.spi.transaction(&mut operations)
    }

    fn write_then_read(&mut self, address: &[u8], read: &mut [u8]) -> Result<(), Self::Error> {
        let mut operations = [
            embedded_hal::spi::Operation::Write(address),
            embedded_hal::spi::Operation::Read(read),
        ];
        self.spi.transaction(&mut operations)
    }
}

#[cfg(feature = "async")]
impl<SPI, E> AsyncTransport for SpiInterface<SPI>
where
    SPI: embedded_hal_async::spi::SpiDevice<Error = E>,
{
    type Error = E;

    fn bus_type(&self) -> BusType {
        BusType::Spi
    }

    async fn write(&mut self, address: &[u8], payload: &[u8]) -> Result<(), Self::Error> {
        let mut operations = [
            embedded_hal_async::spi::Operation::Write(address),
            embedded_hal_async::spi::Operation::Write(payload),
        ];
        self.spi.transaction(&mut operations).await
    }

    async fn write_then_read(
        &mut self,
        address: &[u8],
        read: &mut [u8],
    ) -> Result<(), Self::Error> {
        let mut operations = [
            embedded_hal_async::spi::Operation::Write(address),
            embedded_hal_async::spi::Operation::Read(read),
        ];
        self.spi.transaction(&mut operations).await
    }
}

/// Either an I2C or an SPI transport, chosen at construction
#[derive(Debug)]
pub enum Bus<I, S> {
    /// I2C transport
    I2c(I),
    /// SPI transport
    Spi(S),
}

impl<I, S> Bus<I, S> {
    /// Pick a transport from optional I2C and SPI candidates
    ///
    /// I2C wins when both are present. Returns `None` when neither is.
    pub fn from_options(i2c: Option<I>, spi: Option<S>) -> Option<Self> {
        match (i2c, spi) {
            (Some(i2c), _) => Some(Self::I2c(i2c)),
            (None, Some(spi)) => Some(Self::Spi(spi)),
            (None, None) => None,
        }
    }
}

/// Error from a [`Bus`], tagged with the bus that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError<IE, SE> {
    /// Error from the I2C transport
    I2c(IE),
    /// Error from the SPI transport
    Spi(SE),
}

impl<I, S> Transport for Bus<I, S>
where
    I: Transport,
    S: Transport,
{
    type Error = BusError<I::Error, S::Error>;

    fn bus_type(&self) -> BusType {
        match self {
            Self::I2c(i2c) => i2c.bus_type(),
            Self::Spi(spi) => spi.bus_type(),
        }
    }

    fn write(&mut self, address: &[u8], payload: &[u8]) -> Result<(), Self::Error> {
        match self {
            Self::I2c(i2c) => i2c.write(address, payload).map_err(BusError::I2c),
            Self::Spi(spi) => spi.write(address, payload).map_err(BusError::Spi),
        }
    }

    fn write_then_read(&mut self, address: &[u8], read: &mut [u8]) -> Result<(), Self::Error> {
        match self {
            Self::I2c(i2c) => i2c.write_then_read(address, read).map_err(BusError::I2c),
            Self::Spi(spi) => spi.write_then_read(address, read).map_err(BusError::Spi),
        }
    }
}

#[cfg(feature = "async")]
impl<I, S> AsyncTransport for Bus<I, S>
where
    I: AsyncTransport,
    S: AsyncTransport,
{
    type Error = BusError<I::Error, S::Error>;

    fn bus_type(&self) -> BusType {
        match self {
            Self::I2c(i2c) => i2c.bus_type(),
            Self::Spi(spi) => spi.bus_type(),
        }
    }

    async fn write(&mut self, address: &[u8], payload: &[u8]) -> Result<(), Self::Error> {
        match self {
            Self::I2c(i2c) => i2c.write(address, payload).await.map_err(BusError::I2c),
            Self::Spi(spi) => spi.write(address, payload).await.map_err(BusError::Spi),
        }
    }

    async fn write_then_read(
        &mut self,
        address: &[u8],
        read: &mut [u8],
    ) -> Result<(), Self::Error> {
        match self {
            Self::I2c(i2c) => i2c
                .write_then_read(address, read)
                .await
                .map_err(BusError::I2c),
            Self::Spi(spi) => spi
                .write_then_read(address, read)
                .await
                .map_err(BusError::Spi),
        }
    }
}

/// `device-driver` register interface using the same framing as [`Register`](crate::Register)
///
/// Register maps generated with `device_driver::create_device!` and
/// `RegisterAddressType = u16` can run on top of any [`Transport`] through
/// this adapter. Addresses are framed little-endian into `address_width`
/// bytes and the SPI read bit follows `spi_type`.
///
/// # Example
/// ```ignore
/// let interface = FramedInterface::new(
///     SpiInterface::new(spi_device),
///     AddressWidth::One,
///     SpiRegisterType::AddrBit8HighToRead,
/// );
/// let mut device = MyDevice::new(interface);
/// ```
pub struct FramedInterface<T> {
    transport: T,
    address_width: AddressWidth,
    spi_type: SpiRegisterType,
}

impl<T> FramedInterface<T> {
    /// Wrap `transport` with the given framing
    pub const fn new(transport: T, address_width: AddressWidth, spi_type: SpiRegisterType) -> Self {
        Self {
            transport,
            address_width,
            spi_type,
        }
    }

    /// Consume the adapter and return the transport
    pub fn release(self) -> T {
        self.transport
    }
}

impl<T: Transport> device_driver::RegisterInterface for FramedInterface<T> {
    type Error = T::Error;
    type AddressType = u16;

    fn read_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits; // Size is implicit in read_data.len()
        let frame = AddressFrame::for_read(
            address,
            self.address_width,
            self.transport.bus_type(),
            self.spi_type,
        );
        self.transport.write_then_read(frame.as_bytes(), read_data)
    }

    fn write_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits; // Size is implicit in write_data.len()
        let frame = AddressFrame::for_write(
            address,
            self.address_width,
            self.transport.bus_type(),
            self.spi_type,
        );
        self.transport.write(frame.as_bytes(), write_data)
    }
}

#[cfg(feature = "async")]
impl<T: AsyncTransport> device_driver::AsyncRegisterInterface for FramedInterface<T> {
    type Error = T::Error;
    type AddressType = u16;

    async fn read_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits; // Size is implicit in read_data.len()
        let frame = AddressFrame::for_read(
            address,
            self.address_width,
            self.transport.bus_type(),
            self.spi_type,
        );
        self.transport
            .write_then_read(frame.as_bytes(), read_data)
            .await
    }

    async fn write_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits; // Size is implicit in write_data.len()
        let frame = AddressFrame::for_write(
            address,
            self.address_width,
            self.transport.bus_type(),
            self.spi_type,
        );
        self.transport.write(frame.as_bytes(), write_data).await
    }
}
