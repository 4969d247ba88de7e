//! In-memory bus transport
//!
//! Records every transaction in order and can be told to fail a specific
//! call, so bring-up ordering and error paths can be checked without
//! hardware.

use heapless::Vec;
use ledpack_hal::{BusId, BusOpener, I2cTransport};

/// Maximum transactions kept
pub const MAX_TRANSACTIONS: usize = 32;

/// Maximum block payload kept per transaction
pub const MAX_BLOCK: usize = 32;

/// One recorded bus transaction
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Transaction {
    WriteByte {
        address: u8,
        register: u8,
        value: u8,
    },
    WriteBlock {
        address: u8,
        register: u8,
        data: Vec<u8, MAX_BLOCK>,
    },
}

/// Errors produced by the mock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MockError {
    /// Failure injected on the given call number (1-based)
    Injected { call: usize },
    /// Open was configured to fail
    OpenFailed,
    /// Transaction log or block buffer is full
    Capacity,
}

/// Recording transport
#[derive(Debug, Default)]
pub struct MockBus {
    log: Vec<Transaction, MAX_TRANSACTIONS>,
    calls: usize,
    fail_on: Option<usize>,
}

impl MockBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the `call`th transaction (1-based); it is still recorded
    pub fn failing_on(call: usize) -> Self {
        Self {
            fail_on: Some(call),
            ..Self::default()
        }
    }

    /// Fail the next transaction from now on
    pub fn fail_next(&mut self) {
        self.fail_on = Some(self.calls + 1);
    }

    /// Every attempted transaction, in order
    pub fn transactions(&self) -> &[Transaction] {
        &self.log
    }

    /// Number of attempted transactions
    pub fn calls(&self) -> usize {
        self.calls
    }

    pub fn reset(&mut self) {
        self.log.clear();
        self.calls = 0;
        self.fail_on = None;
    }

    fn record(&mut self, transaction: Transaction) -> Result<(), MockError> {
        self.calls += 1;
        self.log.push(transaction).map_err(|_| MockError::Capacity)?;
        if self.fail_on == Some(self.calls) {
            return Err(MockError::Injected { call: self.calls });
        }
        Ok(())
    }
}

impl I2cTransport for MockBus {
    type Error = MockError;

    async fn write_byte(&mut self, address: u8, register: u8, value: u8) -> Result<(), MockError> {
        self.record(Transaction::WriteByte {
            address,
            register,
            value,
        })
    }

    async fn write_block(&mut self, address: u8, register: u8, data: &[u8]) -> Result<(), MockError> {
        let data = Vec::from_slice(data).map_err(|_| MockError::Capacity)?;
        self.record(Transaction::WriteBlock {
            address,
            register,
            data,
        })
    }
}

/// Opener handing out one [`MockBus`]
#[derive(Debug, Default)]
pub struct MockOpener {
    bus: Option<MockBus>,
    fail: bool,
    /// Bus ids requested so far
    pub opened: Vec<BusId, 4>,
}

impl MockOpener {
    pub fn new(bus: MockBus) -> Self {
        Self {
            bus: Some(bus),
            ..Self::default()
        }
    }

    /// Opener whose `open` always fails
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

impl BusOpener for MockOpener {
    type Bus = MockBus;

    async fn open(&mut self, bus: BusId) -> Result<MockBus, MockError> {
        self.opened.push(bus).map_err(|_| MockError::Capacity)?;
        if self.fail {
            return Err(MockError::OpenFailed);
        }
        self.bus.take().ok_or(MockError::OpenFailed)
    }
}
