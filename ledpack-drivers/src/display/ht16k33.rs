//! HT16K33 LED backpack driver
//!
//! The HT16K33 is an LED matrix/segment controller with 16 bytes of
//! display RAM, an internal oscillator, a hardware blinker and 16-step
//! PWM dimming, all driven over I2C.
//!
//! # Protocol
//!
//! - Setup commands are single bytes (`register tag | setting bits`), sent
//!   as `write_byte(address, command, 0x00)`
//! - Display RAM is written as one 16-byte block at register 0x00
//!
//! # Bring-up
//!
//! Strictly sequential, each step waiting for the previous transfer:
//!
//! 1. Oscillator on (nothing else is meaningful until it runs)
//! 2. Display on, blink off
//! 3. Brightness to the configured level
//! 4. Clear the buffer and flush it
//!
//! The first failure aborts the rest and the driver stays `Failed`; a new
//! driver must be created to retry. Failures after bring-up are returned to
//! the caller and the driver stays `Ready`.
//!
//! # Usage
//!
//! ```ignore
//! let mut display = Ht16k33::open(&mut opener, DriverConfig::default(), ()).await?;
//! display.set_buffer_block(0, 0x3F, false)?;
//! display.set_buffer_block(1, 0x06, true)?;
//! display.write_display().await?;
//! ```
//!
//! Operations borrow the driver mutably, so one owner issues them one at a
//! time. Callers sharing a driver across tasks must wrap it in their own
//! mutex.

use ledpack_core::command::{reg, COMMAND_ARG};
use ledpack_core::{
    BlinkRate, Brightness, Command, ControllerState, DisplayBuffer, DisplayPower, DriverConfig,
    Error, InitStep, Lifecycle, LifecycleEvent, Operation,
};
use ledpack_hal::{BusOpener, DeviceAddress, I2cTransport};

use super::observer::LifecycleObserver;

/// HT16K33 driver
pub struct Ht16k33<B> {
    bus: B,
    config: DriverConfig,
    buffer: DisplayBuffer,
    state: ControllerState,
    lifecycle: Lifecycle,
}

impl<B: I2cTransport> Ht16k33<B> {
    /// Create a driver on an already-open bus
    ///
    /// The driver starts `Uninitialized` with a zeroed buffer; call
    /// [`init`](Self::init) before using it.
    pub fn new(bus: B, config: DriverConfig) -> Self {
        Self {
            bus,
            config,
            buffer: DisplayBuffer::new(),
            state: ControllerState::default(),
            lifecycle: Lifecycle::Uninitialized,
        }
    }

    /// Open the configured bus and bring the controller up
    ///
    /// `observer` is told exactly once whether the driver became ready or
    /// failed. On failure no driver is returned.
    pub async fn open<O, L>(
        opener: &mut O,
        config: DriverConfig,
        mut observer: L,
    ) -> Result<Self, Error<B::Error>>
    where
        O: BusOpener<Bus = B>,
        L: LifecycleObserver<B::Error>,
    {
        let bus = match opener.open(config.bus).await {
            Ok(bus) => bus,
            Err(e) => {
                #[cfg(feature = "defmt")]
                defmt::error!("ht16k33: failed to open bus {}", config.bus);

                let err = Error::TransportOpen(e);
                observer.on_error(&err);
                return Err(err);
            }
        };

        let mut driver = Self::new(bus, config);
        driver.init(observer).await?;
        Ok(driver)
    }

    /// Run the bring-up sequence
    ///
    /// Only valid from `Uninitialized`; any other state returns
    /// [`Error::NotReady`] without touching the bus or the observer.
    pub async fn init<L>(&mut self, mut observer: L) -> Result<(), Error<B::Error>>
    where
        L: LifecycleObserver<B::Error>,
    {
        if self.lifecycle != Lifecycle::Uninitialized {
            return Err(Error::NotReady(self.lifecycle));
        }
        self.lifecycle = self.lifecycle.transition(LifecycleEvent::Started);

        match self.bring_up().await {
            Ok(()) => {
                self.lifecycle = self.lifecycle.transition(LifecycleEvent::Completed);

                #[cfg(feature = "defmt")]
                defmt::info!("ht16k33 {=u8:#x}: ready", self.config.address.get());

                observer.on_ready();
                Ok(())
            }
            Err((step, source)) => {
                self.lifecycle = self.lifecycle.transition(LifecycleEvent::Failed(step));

                #[cfg(feature = "defmt")]
                defmt::error!(
                    "ht16k33 {=u8:#x}: bring-up failed at {}",
                    self.config.address.get(),
                    step.name()
                );

                let err = Error::TransportIo {
                    op: Operation::Init(step),
                    source,
                };
                observer.on_error(&err);
                Err(err)
            }
        }
    }

    /// The four bring-up steps, in order; the first failure wins
    async fn bring_up(&mut self) -> Result<(), (InitStep, B::Error)> {
        self.command(Command::Oscillator(true))
            .await
            .map_err(|e| (InitStep::OscillatorOn, e))?;

        self.apply_display(self.state.power, BlinkRate::Off)
            .await
            .map_err(|e| (InitStep::BlinkOff, e))?;

        self.apply_brightness(self.config.initial_brightness)
            .await
            .map_err(|e| (InitStep::Brightness, e))?;

        self.buffer.clear();
        self.flush().await.map_err(|e| (InitStep::Clear, e))?;

        Ok(())
    }

    /// Set the hardware blink rate, keeping the current power state
    pub async fn set_blink_rate(&mut self, rate: BlinkRate) -> Result<(), Error<B::Error>> {
        self.ensure_ready()?;
        let power = self.state.power;
        self.apply_display(power, rate)
            .await
            .map_err(|e| Self::io_error(Operation::SetBlinkRate, e))
    }

    /// Set the dimming level; values outside 0..=15 are clamped
    pub async fn set_brightness(
        &mut self,
        level: impl Into<Brightness>,
    ) -> Result<(), Error<B::Error>> {
        self.ensure_ready()?;
        self.apply_brightness(level.into())
            .await
            .map_err(|e| Self::io_error(Operation::SetBrightness, e))
    }

    /// Switch the display output on or off, keeping the blink rate
    pub async fn set_display_power(&mut self, power: DisplayPower) -> Result<(), Error<B::Error>> {
        self.ensure_ready()?;
        let blink = self.state.blink;
        self.apply_display(power, blink)
            .await
            .map_err(|e| Self::io_error(Operation::SetDisplayPower, e))
    }

    /// Store a segment pattern in buffer row `index`
    ///
    /// Only the in-memory buffer changes; call
    /// [`write_display`](Self::write_display) to push it. Rows outside
    /// 0..8 (including negative indices) are rejected.
    pub fn set_buffer_block(
        &mut self,
        index: i32,
        pattern: u16,
        decimal_point: bool,
    ) -> Result<(), Error<B::Error>> {
        let row = usize::try_from(index).map_err(|_| Error::BufferRange { index })?;
        self.buffer
            .set(row, pattern, decimal_point)
            .map_err(|_| Error::BufferRange { index })
    }

    /// Zero the buffer and flush it
    pub async fn clear(&mut self) -> Result<(), Error<B::Error>> {
        self.ensure_ready()?;
        self.buffer.clear();
        self.flush()
            .await
            .map_err(|e| Self::io_error(Operation::Clear, e))
    }

    /// Push the whole buffer to display RAM in one transaction
    ///
    /// The buffer is left as-is whatever the outcome.
    pub async fn write_display(&mut self) -> Result<(), Error<B::Error>> {
        self.ensure_ready()?;
        self.flush()
            .await
            .map_err(|e| Self::io_error(Operation::WriteDisplay, e))
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Last controller state acknowledged by the bus
    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn buffer(&self) -> &DisplayBuffer {
        &self.buffer
    }

    pub fn address(&self) -> DeviceAddress {
        self.config.address
    }

    /// Give the bus back, dropping the driver
    pub fn release(self) -> B {
        self.bus
    }

    fn ensure_ready(&self) -> Result<(), Error<B::Error>> {
        if self.lifecycle.is_ready() {
            Ok(())
        } else {
            Err(Error::NotReady(self.lifecycle))
        }
    }

    fn io_error(op: Operation, source: B::Error) -> Error<B::Error> {
        #[cfg(feature = "defmt")]
        defmt::warn!("ht16k33: {} failed", op);

        Error::TransportIo { op, source }
    }

    async fn command(&mut self, cmd: Command) -> Result<(), B::Error> {
        #[cfg(feature = "defmt")]
        defmt::debug!(
            "ht16k33 {=u8:#x}: {} ({=u8:#x})",
            self.config.address.get(),
            cmd.name(),
            cmd.encode()
        );

        self.bus
            .write_byte(self.config.address.get(), cmd.encode(), COMMAND_ARG)
            .await
    }

    async fn apply_display(&mut self, power: DisplayPower, blink: BlinkRate) -> Result<(), B::Error> {
        self.command(Command::Display(power, blink)).await?;
        self.state.power = power;
        self.state.blink = blink;
        Ok(())
    }

    async fn apply_brightness(&mut self, level: Brightness) -> Result<(), B::Error> {
        self.command(Command::Brightness(level)).await?;
        self.state.brightness = Some(level);
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), B::Error> {
        let frame = self.buffer.serialize();
        self.bus
            .write_block(self.config.address.get(), reg::DISPLAY_RAM, &frame)
            .await
    }
}
