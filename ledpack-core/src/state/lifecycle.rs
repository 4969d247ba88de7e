//! Driver lifecycle state machine
//!
//! ```text
//! Uninitialized ──Started──▶ Initializing ──Completed──▶ Ready
//!       │                         │
//!       └──────Failed(step)───────┴──────▶ Failed(step)
//! ```
//!
//! `Failed` is terminal. `Ready` is never left: runtime I/O errors are
//! reported to the caller of the failing operation instead.

/// One step of bring-up, in the order it runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitStep {
    /// Opening the bus handle
    OpenBus,
    /// Enabling the internal oscillator
    OscillatorOn,
    /// Display on with blinking disabled
    BlinkOff,
    /// Setting the configured brightness
    Brightness,
    /// Zeroing the buffer and flushing it
    Clear,
}

impl InitStep {
    /// Bus steps issued after a successful open, strictly in this order.
    /// The oscillator must run before any display command means anything.
    pub const SEQUENCE: [InitStep; 4] = [
        InitStep::OscillatorOn,
        InitStep::BlinkOff,
        InitStep::Brightness,
        InitStep::Clear,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            InitStep::OpenBus => "open-bus",
            InitStep::OscillatorOn => "oscillator-on",
            InitStep::BlinkOff => "blink-off",
            InitStep::Brightness => "brightness",
            InitStep::Clear => "clear",
        }
    }
}

/// Driver lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Lifecycle {
    /// Constructed, bring-up not started
    #[default]
    Uninitialized,
    /// Bring-up sequence in progress
    Initializing,
    /// Accepting runtime operations
    Ready,
    /// Bring-up failed at the given step; the driver must be recreated
    Failed(InitStep),
}

/// Events that drive the lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LifecycleEvent {
    /// Bring-up started
    Started,
    /// Every bring-up step succeeded
    Completed,
    /// A bring-up step failed
    Failed(InitStep),
}

impl Lifecycle {
    /// Whether runtime operations are accepted
    pub fn is_ready(&self) -> bool {
        matches!(self, Lifecycle::Ready)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Lifecycle::Failed(_))
    }

    /// Process an event and return the next state
    pub fn transition(self, event: LifecycleEvent) -> Self {
        use Lifecycle::*;
        use LifecycleEvent as E;

        match (self, event) {
            (Uninitialized, E::Started) => Initializing,
            (Uninitialized | Initializing, E::Failed(step)) => Failed(step),
            (Initializing, E::Completed) => Ready,

            // Terminal / stable states ignore everything
            (Failed(step), _) => Failed(step),
            (Ready, _) => Ready,

            // Invalid transitions - stay in current state
            (state, _) => state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let state = Lifecycle::default();
        assert_eq!(state, Lifecycle::Uninitialized);

        let state = state.transition(LifecycleEvent::Started);
        assert_eq!(state, Lifecycle::Initializing);

        let state = state.transition(LifecycleEvent::Completed);
        assert_eq!(state, Lifecycle::Ready);
        assert!(state.is_ready());
    }

    #[test]
    fn test_init_failure_is_terminal() {
        let state = Lifecycle::Initializing.transition(LifecycleEvent::Failed(InitStep::Brightness));
        assert_eq!(state, Lifecycle::Failed(InitStep::Brightness));

        assert_eq!(state.transition(LifecycleEvent::Started), state);
        assert_eq!(state.transition(LifecycleEvent::Completed), state);
        assert!(!state.is_ready());
    }

    #[test]
    fn test_open_failure_before_start() {
        let state = Lifecycle::Uninitialized.transition(LifecycleEvent::Failed(InitStep::OpenBus));
        assert_eq!(state, Lifecycle::Failed(InitStep::OpenBus));
    }

    #[test]
    fn test_ready_ignores_failures() {
        let state = Lifecycle::Ready.transition(LifecycleEvent::Failed(InitStep::Clear));
        assert_eq!(state, Lifecycle::Ready);
    }

    #[test]
    fn test_complete_requires_initializing() {
        let state = Lifecycle::Uninitialized.transition(LifecycleEvent::Completed);
        assert_eq!(state, Lifecycle::Uninitialized);
    }

    #[test]
    fn test_sequence_order() {
        assert_eq!(
            InitStep::SEQUENCE,
            [
                InitStep::OscillatorOn,
                InitStep::BlinkOff,
                InitStep::Brightness,
                InitStep::Clear
            ]
        );
    }
}
