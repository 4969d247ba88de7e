//! Ready/error notification
//!
//! The driver calls an observer at most once per lifecycle: `on_ready`
//! after a successful bring-up, or `on_error` when opening or bring-up
//! fails. Runtime errors are returned from the failing call instead.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;
use ledpack_core::Error;

/// Receives the outcome of driver bring-up
pub trait LifecycleObserver<E> {
    /// Bring-up finished; the driver is `Ready`
    fn on_ready(&mut self) {}

    /// Opening the bus or a bring-up step failed; the driver is unusable
    fn on_error(&mut self, error: &Error<E>) {
        let _ = error;
    }
}

/// Ignore lifecycle notifications
impl<E> LifecycleObserver<E> for () {}

impl<E, T: LifecycleObserver<E> + ?Sized> LifecycleObserver<E> for &mut T {
    fn on_ready(&mut self) {
        (**self).on_ready();
    }

    fn on_error(&mut self, error: &Error<E>) {
        (**self).on_error(error);
    }
}

/// Single-shot notification another task can `wait()` on
impl<M: RawMutex, E: Clone> LifecycleObserver<E> for &Signal<M, Result<(), Error<E>>> {
    fn on_ready(&mut self) {
        self.signal(Ok(()));
    }

    fn on_error(&mut self, error: &Error<E>) {
        self.signal(Err(error.clone()));
    }
}

/// Counts notifications and keeps the last error
#[derive(Debug, Clone)]
pub struct EventLog<E> {
    pub ready: u32,
    pub errors: u32,
    pub last_error: Option<Error<E>>,
}

impl<E> Default for EventLog<E> {
    fn default() -> Self {
        Self {
            ready: 0,
            errors: 0,
            last_error: None,
        }
    }
}

impl<E: Clone> LifecycleObserver<E> for EventLog<E> {
    fn on_ready(&mut self) {
        self.ready += 1;
    }

    fn on_error(&mut self, error: &Error<E>) {
        self.errors += 1;
        self.last_error = Some(error.clone());
    }
}
