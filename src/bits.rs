//! Bit field views over a register
//!
//! A [`RegisterBits`] borrows its parent [`Register`] for as long as the view
//! lives and performs read-modify-write cycles on the whole register value.
//!
//! The field mask covers exactly `bits` bits: `(1 << bits) - 1`.
//!
//! # Example
//!
//! ```ignore
//! # let mut ctrl: bus_register::Register<_> = todo!();
//! // Output data rate lives in bits 4..7 of CTRL
//! let mut odr = ctrl.bits(3, 4)?;
//! odr.write(0b101)?;
//! assert_eq!(odr.read()?, 0b101);
//! ```
//!
//! The read-modify-write is not atomic: a write to the same register from
//! elsewhere between the read and the write-back is lost.

use crate::register::Register;
use crate::{Error, MAX_INTEGER_WIDTH};

#[cfg(not(feature = "async"))]
use crate::Transport;

#[cfg(feature = "async")]
use crate::AsyncTransport;

/// Mask covering the low `bits` bits
pub const fn field_mask(bits: u8) -> u32 {
    if bits >= 32 {
        u32::MAX
    } else {
        (1u32 << bits) - 1
    }
}

/// Whether a field of `bits` bits at `shift` fits in a value of `width` bytes
///
/// Integer access stops at four bytes, so wider registers are capped there.
pub const fn field_fits(width: u8, bits: u8, shift: u8) -> bool {
    let width = if width > MAX_INTEGER_WIDTH {
        MAX_INTEGER_WIDTH
    } else {
        width
    };
    bits >= 1 && (shift as u16 + bits as u16) <= width as u16 * 8
}

/// Contiguous bit field inside a [`Register`]
pub struct RegisterBits<'r, T> {
    register: &'r mut Register<T>,
    bits: u8,
    shift: u8,
}

impl<T> RegisterBits<'_, T> {
    /// Field width in bits
    pub const fn bits(&self) -> u8 {
        self.bits
    }

    /// Offset of the lowest field bit within the register value
    pub const fn shift(&self) -> u8 {
        self.shift
    }

    /// Unshifted field mask
    pub const fn mask(&self) -> u32 {
        field_mask(self.bits)
    }

    /// Replace the field bits of `value` with `data`
    fn merge(&self, value: u32, data: u32) -> u32 {
        let mask = self.mask();
        (value & !(mask << self.shift)) | ((data & mask) << self.shift)
    }

    fn invalid_field<E>(bits: u8, shift: u8) -> Error<E> {
        #[cfg(feature = "defmt")]
        defmt::warn!("bit field {}@{} does not fit the register", bits, shift);

        Error::InvalidField { bits, shift }
    }
}

#[cfg(not(feature = "async"))]
impl<'r, T: Transport> RegisterBits<'r, T> {
    /// Create a view of `bits` bits starting at bit `shift` of `register`
    ///
    /// # Errors
    ///
    /// Returns `InvalidField` if `bits` is zero or the field extends past the
    /// register value.
    pub fn new(register: &'r mut Register<T>, bits: u8, shift: u8) -> Result<Self, Error<T::Error>> {
        if !field_fits(register.width(), bits, shift) {
            return Err(Self::invalid_field(bits, shift));
        }
        Ok(Self {
            register,
            bits,
            shift,
        })
    }

    /// Read the field value
    ///
    /// # Errors
    ///
    /// Returns an error if the register read fails.
    pub fn read(&mut self) -> Result<u32, Error<T::Error>> {
        let value = self.register.read()?;
        Ok((value >> self.shift) & self.mask())
    }

    /// Write `data` into the field, keeping all other register bits
    ///
    /// Bits of `data` above the field width are discarded.
    ///
    /// # Errors
    ///
    /// Returns an error if the register read or write fails. Nothing is
    /// written when the read fails.
    pub fn write(&mut self, data: u32) -> Result<(), Error<T::Error>> {
        let current = self.register.read()?;
        let value = self.merge(current, data);
        let width = self.register.width();
        self.register.write_sized(value, width)
    }
}

#[cfg(feature = "async")]
impl<'r, T: AsyncTransport> RegisterBits<'r, T> {
    /// Create a view of `bits` bits starting at bit `shift` of `register`
    ///
    /// # Errors
    ///
    /// Returns `InvalidField` if `bits` is zero or the field extends past the
    /// register value.
    pub fn new(register: &'r mut Register<T>, bits: u8, shift: u8) -> Result<Self, Error<T::Error>> {
        if !field_fits(register.width(), bits, shift) {
            return Err(Self::invalid_field(bits, shift));
        }
        Ok(Self {
            register,
            bits,
            shift,
        })
    }

    /// Read the field value
    ///
    /// # Errors
    ///
    /// Returns an error if the register read fails.
    pub async fn read(&mut self) -> Result<u32, Error<T::Error>> {
        let value = self.register.read().await?;
        Ok((value >> self.shift) & self.mask())
    }

    /// Write `data` into the field, keeping all other register bits
    ///
    /// # Errors
    ///
    /// Returns an error if the register read or write fails.
    pub async fn write(&mut self, data: u32) -> Result<(), Error<T::Error>> {
        let current = self.register.read().await?;
        let value = self.merge(current, data);
        let width = self.register.width();
        self.register.write_sized(value, width).await
    }
}
