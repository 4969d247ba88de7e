//! Driver error types
//!
//! Open failures and bring-up I/O failures are fatal to the driver.
//! Runtime I/O failures are returned to the caller and leave the driver
//! usable. Out-of-range blink rate and brightness values are never
//! errors; they are coerced where they are constructed.

use core::fmt;

use crate::state::{InitStep, Lifecycle};

/// Bus operation that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Operation {
    /// A bring-up step
    Init(InitStep),
    SetBlinkRate,
    SetBrightness,
    SetDisplayPower,
    Clear,
    WriteDisplay,
}

/// Errors reported by the driver, generic over the transport error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The bus could not be opened
    TransportOpen(E),
    /// A write failed
    TransportIo { op: Operation, source: E },
    /// Buffer row index outside 0..8
    BufferRange { index: i32 },
    /// Operation attempted outside the `Ready` state
    NotReady(Lifecycle),
}

impl<E> Error<E> {
    /// Whether this error ends the driver's lifecycle
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::TransportOpen(_)
                | Error::TransportIo {
                    op: Operation::Init(_),
                    ..
                }
        )
    }

    /// Bring-up step this error aborted, if any
    pub fn init_step(&self) -> Option<InitStep> {
        match self {
            Error::TransportOpen(_) => Some(InitStep::OpenBus),
            Error::TransportIo {
                op: Operation::Init(step),
                ..
            } => Some(*step),
            _ => None,
        }
    }

    /// Transport error carried by this error, if any
    pub fn transport_error(&self) -> Option<&E> {
        match self {
            Error::TransportOpen(e) | Error::TransportIo { source: e, .. } => Some(e),
            _ => None,
        }
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::TransportOpen(e) => write!(f, "failed to open bus: {:?}", e),
            Error::TransportIo { op, source } => write!(f, "{:?} failed: {:?}", op, source),
            Error::BufferRange { index } => {
                write!(f, "buffer block {} out of range 0..{}", index, crate::BUFFER_ROWS)
            }
            Error::NotReady(state) => write!(f, "driver not ready ({:?})", state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        let open: Error<u8> = Error::TransportOpen(1);
        assert!(open.is_fatal());
        assert_eq!(open.init_step(), Some(InitStep::OpenBus));

        let init: Error<u8> = Error::TransportIo {
            op: Operation::Init(InitStep::Brightness),
            source: 2,
        };
        assert!(init.is_fatal());
        assert_eq!(init.init_step(), Some(InitStep::Brightness));
        assert_eq!(init.transport_error(), Some(&2));

        let runtime: Error<u8> = Error::TransportIo {
            op: Operation::WriteDisplay,
            source: 3,
        };
        assert!(!runtime.is_fatal());
        assert_eq!(runtime.init_step(), None);

        let range: Error<u8> = Error::BufferRange { index: -1 };
        assert!(!range.is_fatal());
        assert_eq!(range.transport_error(), None);
    }
}
