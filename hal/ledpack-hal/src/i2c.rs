//! I2C bus abstractions
//!
//! Provides the transport traits the backpack driver is written against,
//! and an adapter that implements them on top of any
//! `embedded-hal-async` I2C master.

use embedded_hal::i2c::{Error as _, ErrorKind};
use embedded_hal_async::i2c::I2c;
use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest block the adapter will stage in one write (SMBus block limit)
pub const MAX_BLOCK_LEN: usize = 32;

/// Host bus identifier (e.g. `1` for `/dev/i2c-1`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BusId(pub u8);

/// Error constructing a [`DeviceAddress`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AddressError {
    /// Address does not fit in 7 bits
    OutOfRange(u8),
}

impl core::fmt::Display for AddressError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AddressError::OutOfRange(a) => write!(f, "I2C address {:#04x} exceeds 7 bits", a),
        }
    }
}

/// 7-bit I2C device address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub struct DeviceAddress(u8);

impl DeviceAddress {
    /// Factory address of an HT16K33 with no address jumpers bridged
    pub const HT16K33_DEFAULT: Self = Self(0x70);

    /// Highest valid 7-bit address
    pub const MAX: u8 = 0x7F;

    /// Create an address, rejecting anything above 0x7F
    pub const fn new(address: u8) -> Result<Self, AddressError> {
        if address > Self::MAX {
            Err(AddressError::OutOfRange(address))
        } else {
            Ok(Self(address))
        }
    }

    /// Raw 7-bit value
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl Default for DeviceAddress {
    fn default() -> Self {
        Self::HT16K33_DEFAULT
    }
}

impl From<DeviceAddress> for u8 {
    fn from(address: DeviceAddress) -> u8 {
        address.0
    }
}

impl TryFrom<u8> for DeviceAddress {
    type Error = AddressError;

    fn try_from(address: u8) -> Result<Self, Self::Error> {
        Self::new(address)
    }
}

/// Byte-oriented bus transport
///
/// Each call completes only once the transfer has finished on the wire,
/// or fails with the transport's error.
#[allow(async_fn_in_trait)]
pub trait I2cTransport {
    /// Error type for bus operations
    type Error;

    /// Write a single command/register byte followed by one data byte
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `register` - Command or register byte
    /// * `value` - Data byte sent after the register
    async fn write_byte(&mut self, address: u8, register: u8, value: u8)
        -> Result<(), Self::Error>;

    /// Write a block of data starting at a register, in one transaction
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `register` - Start register
    /// * `data` - Bytes written after the register
    async fn write_block(&mut self, address: u8, register: u8, data: &[u8])
        -> Result<(), Self::Error>;
}

/// Opens a bus by identifier
///
/// Open failures share the transport's error type, so a driver can report
/// open and I/O failures through a single error channel.
#[allow(async_fn_in_trait)]
pub trait BusOpener {
    /// Transport produced by a successful open
    type Bus: I2cTransport;

    /// Open the bus identified by `bus`
    async fn open(&mut self, bus: BusId) -> Result<Self::Bus, <Self::Bus as I2cTransport>::Error>;
}

/// Errors from the embedded-hal adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HalBusError {
    /// Underlying I2C peripheral reported an error
    Bus(ErrorKind),
    /// Block is larger than [`MAX_BLOCK_LEN`]
    BlockTooLong,
    /// No peripheral is registered for this bus id
    UnknownBus(BusId),
    /// The peripheral has already been handed out
    AlreadyOpen,
}

/// [`I2cTransport`] over an `embedded-hal-async` I2C master
pub struct HalBus<I2C> {
    i2c: I2C,
}

impl<I2C> HalBus<I2C> {
    /// Wrap an I2C peripheral
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    /// Give the peripheral back
    pub fn into_inner(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> I2cTransport for HalBus<I2C> {
    type Error = HalBusError;

    async fn write_byte(&mut self, address: u8, register: u8, value: u8) -> Result<(), HalBusError> {
        self.i2c
            .write(address, &[register, value])
            .await
            .map_err(|e| HalBusError::Bus(e.kind()))
    }

    async fn write_block(&mut self, address: u8, register: u8, data: &[u8]) -> Result<(), HalBusError> {
        if data.len() > MAX_BLOCK_LEN {
            return Err(HalBusError::BlockTooLong);
        }

        let mut frame: Vec<u8, { MAX_BLOCK_LEN + 1 }> = Vec::new();
        frame.push(register).map_err(|_| HalBusError::BlockTooLong)?;
        frame
            .extend_from_slice(data)
            .map_err(|_| HalBusError::BlockTooLong)?;

        self.i2c
            .write(address, &frame)
            .await
            .map_err(|e| HalBusError::Bus(e.kind()))
    }
}

/// [`BusOpener`] for boards that construct their one I2C peripheral up front
pub struct SingleBusOpener<I2C> {
    id: BusId,
    i2c: Option<I2C>,
}

impl<I2C> SingleBusOpener<I2C> {
    /// Register `i2c` as bus `id`
    pub fn new(id: BusId, i2c: I2C) -> Self {
        Self { id, i2c: Some(i2c) }
    }
}

impl<I2C: I2c> BusOpener for SingleBusOpener<I2C> {
    type Bus = HalBus<I2C>;

    async fn open(&mut self, bus: BusId) -> Result<HalBus<I2C>, HalBusError> {
        if bus != self.id {
            return Err(HalBusError::UnknownBus(bus));
        }
        self.i2c.take().map(HalBus::new).ok_or(HalBusError::AlreadyOpen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;
    use embedded_hal_async::i2c::{ErrorType, Operation};

    /// Records every write; fails all transfers when `fail` is set
    #[derive(Default)]
    struct FakeI2c {
        writes: Vec<(u8, Vec<u8, 64>), 8>,
        fail: Option<ErrorKind>,
    }

    impl ErrorType for FakeI2c {
        type Error = ErrorKind;
    }

    impl I2c for FakeI2c {
        async fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), ErrorKind> {
            if let Some(kind) = self.fail {
                return Err(kind);
            }
            for op in operations.iter() {
                if let Operation::Write(bytes) = op {
                    let mut v = Vec::new();
                    v.extend_from_slice(bytes).unwrap();
                    self.writes.push((address, v)).unwrap();
                }
            }
            Ok(())
        }
    }

    #[test]
    fn test_device_address_range() {
        assert_eq!(DeviceAddress::new(0x70).unwrap().get(), 0x70);
        assert_eq!(DeviceAddress::new(0x7F).unwrap().get(), 0x7F);
        assert_eq!(DeviceAddress::new(0x80), Err(AddressError::OutOfRange(0x80)));
        assert_eq!(DeviceAddress::default(), DeviceAddress::HT16K33_DEFAULT);
    }

    #[test]
    fn test_write_byte_frames_register_then_value() {
        let mut bus = HalBus::new(FakeI2c::default());
        block_on(bus.write_byte(0x70, 0x21, 0x00)).unwrap();

        let i2c = bus.into_inner();
        assert_eq!(i2c.writes.len(), 1);
        assert_eq!(i2c.writes[0].0, 0x70);
        assert_eq!(&i2c.writes[0].1[..], &[0x21, 0x00]);
    }

    #[test]
    fn test_write_block_prefixes_register() {
        let mut bus = HalBus::new(FakeI2c::default());
        block_on(bus.write_block(0x71, 0x00, &[1, 2, 3, 4])).unwrap();

        let i2c = bus.into_inner();
        assert_eq!(&i2c.writes[0].1[..], &[0x00, 1, 2, 3, 4]);
    }

    #[test]
    fn test_write_block_too_long_skips_bus() {
        let mut bus = HalBus::new(FakeI2c::default());
        let data = [0u8; MAX_BLOCK_LEN + 1];
        let result = block_on(bus.write_block(0x70, 0x00, &data));

        assert_eq!(result, Err(HalBusError::BlockTooLong));
        assert!(bus.into_inner().writes.is_empty());
    }

    #[test]
    fn test_bus_error_kind_is_preserved() {
        let mut bus = HalBus::new(FakeI2c {
            fail: Some(ErrorKind::ArbitrationLoss),
            ..Default::default()
        });
        let result = block_on(bus.write_byte(0x70, 0x81, 0x00));
        assert_eq!(result, Err(HalBusError::Bus(ErrorKind::ArbitrationLoss)));
    }

    #[test]
    fn test_single_bus_opener() {
        let mut opener = SingleBusOpener::new(BusId(1), FakeI2c::default());

        assert!(matches!(
            block_on(opener.open(BusId(0))),
            Err(HalBusError::UnknownBus(BusId(0)))
        ));
        assert!(block_on(opener.open(BusId(1))).is_ok());
        assert!(matches!(
            block_on(opener.open(BusId(1))),
            Err(HalBusError::AlreadyOpen)
        ));
    }
}
