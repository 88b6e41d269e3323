/// Command intake: the handoff between the command source (UI thread) and
/// the engine (ticker thread).
///
/// Every command is a one-shot flag. The command source sets it, the engine
/// clears it inside `tick()`, so a command is consumed at most once and never
/// seen twice.
///
/// Start, stop and the prize offer interact, so they share one lock: each
/// transition on either side sees the other side's writes as a whole. Place
/// requests are independent and stay a bare atomic flag.
///
/// `in_progress` is flipped eagerly by `request_start` / `request_stop` so a
/// second start is refused before the engine has even seen the first one.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Protocol misuse by the command source. Engine state is left untouched.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EngineError {
    InvalidOperation(&'static str),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidOperation(what) => write!(f, "invalid operation: {what}"),
        }
    }
}

impl std::error::Error for EngineError {}

/// Player's answer to a minor-prize offer.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PrizeDecision {
    Accept,
    Decline,
}

/// Start and stop requests drained together in one tick.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub(crate) struct Lifecycle {
    pub stop: bool,
    pub start: bool,
}

#[derive(Debug, Default)]
struct Control {
    in_progress: bool,
    pending_start: bool,
    pending_stop: bool,
    offer_open: bool,
    decision: Option<PrizeDecision>,
}

#[derive(Debug, Default)]
struct Shared {
    control: Mutex<Control>,
    pending_place: AtomicBool,
}

/// Cloneable, thread-safe handle onto the engine's command flags.
#[derive(Clone, Debug, Default)]
pub struct CommandIntake {
    shared: Arc<Shared>,
}

impl CommandIntake {
    pub fn new() -> Self {
        CommandIntake::default()
    }

    /// No critical section can leave `Control` half-written, so a panic on
    /// the other thread does not make the flags unusable.
    fn control(&self) -> MutexGuard<'_, Control> {
        self.shared.control.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ── Command source side ──

impl CommandIntake {
    /// Ask for a new game. Fails if one is already running.
    pub fn request_start(&self) -> Result<(), EngineError> {
        let mut c = self.control();
        if c.in_progress {
            return Err(EngineError::InvalidOperation("game already in progress"));
        }
        c.in_progress = true;
        c.pending_start = true;
        Ok(())
    }

    /// Ask for the running game to end. Fails if none is running.
    ///
    /// A start or place the engine has not picked up yet is cancelled
    /// outright.
    pub fn request_stop(&self) -> Result<(), EngineError> {
        let mut c = self.control();
        if !c.in_progress {
            return Err(EngineError::InvalidOperation("game already stopped"));
        }
        self.shared.pending_place.store(false, Ordering::Release);
        c.in_progress = false;
        c.pending_start = false;
        c.pending_stop = true;
        c.offer_open = false;
        c.decision = None;
        Ok(())
    }

    /// Freeze the sliding block. Ignored by the engine unless a block is sliding.
    pub fn request_place(&self) {
        self.shared.pending_place.store(true, Ordering::Release);
    }

    /// Answer an outstanding minor-prize offer.
    pub fn resolve_minor_prize_offer(&self, accept: bool) -> Result<(), EngineError> {
        let mut c = self.control();
        if !c.offer_open {
            return Err(EngineError::InvalidOperation("no prize offer outstanding"));
        }
        c.offer_open = false;
        c.decision = Some(if accept { PrizeDecision::Accept } else { PrizeDecision::Decline });
        Ok(())
    }

    pub fn is_in_progress(&self) -> bool {
        self.control().in_progress
    }

    pub fn is_offer_open(&self) -> bool {
        self.control().offer_open
    }
}

// ── Engine side ──

impl CommandIntake {
    /// Drain the stop and start requests in one step, so a stop/start pair
    /// issued mid-tick is never split across two ticks.
    pub(crate) fn take_lifecycle(&self) -> Lifecycle {
        let mut c = self.control();
        Lifecycle {
            stop: std::mem::take(&mut c.pending_stop),
            start: std::mem::take(&mut c.pending_start),
        }
    }

    pub(crate) fn take_place(&self) -> bool {
        self.shared.pending_place.swap(false, Ordering::AcqRel)
    }

    pub(crate) fn take_decision(&self) -> Option<PrizeDecision> {
        self.control().decision.take()
    }

    /// Open the minor-prize offer. Refused when a stop is waiting for the
    /// next tick; the stop wins.
    pub(crate) fn open_offer(&self) -> bool {
        let mut c = self.control();
        if c.pending_stop || !c.in_progress {
            return false;
        }
        c.decision = None;
        c.offer_open = true;
        true
    }

    /// The engine ended the game on its own (loss or prize).
    ///
    /// A start already queued behind a stop belongs to the next game and
    /// keeps `in_progress` set.
    pub(crate) fn end_game(&self) {
        let mut c = self.control();
        c.offer_open = false;
        c.decision = None;
        if !c.pending_start {
            c.in_progress = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_is_refused_while_running() {
        let intake = CommandIntake::new();
        assert!(intake.request_start().is_ok());
        assert_eq!(
            intake.request_start(),
            Err(EngineError::InvalidOperation("game already in progress"))
        );
        assert_eq!(intake.take_lifecycle(), Lifecycle { stop: false, start: true });
        assert_eq!(intake.take_lifecycle(), Lifecycle::default());
    }

    #[test]
    fn stop_is_refused_while_idle() {
        let intake = CommandIntake::new();
        assert!(intake.request_stop().is_err());
        assert_eq!(intake.take_lifecycle(), Lifecycle::default());
    }

    #[test]
    fn stop_cancels_an_unconsumed_start() {
        let intake = CommandIntake::new();
        intake.request_start().unwrap();
        intake.request_stop().unwrap();
        assert!(!intake.is_in_progress());
        assert_eq!(intake.take_lifecycle(), Lifecycle { stop: true, start: false });
    }

    #[test]
    fn stop_then_start_are_drained_together() {
        let intake = CommandIntake::new();
        intake.request_start().unwrap();
        intake.take_lifecycle();
        intake.request_stop().unwrap();
        intake.request_start().unwrap();
        assert!(intake.is_in_progress());
        assert_eq!(intake.take_lifecycle(), Lifecycle { stop: true, start: true });
    }

    #[test]
    fn stop_drops_a_queued_place() {
        let intake = CommandIntake::new();
        intake.request_start().unwrap();
        intake.request_place();
        intake.request_stop().unwrap();
        assert!(!intake.take_place());
    }

    #[test]
    fn place_is_consumed_once() {
        let intake = CommandIntake::new();
        intake.request_place();
        intake.request_place();
        assert!(intake.take_place());
        assert!(!intake.take_place());
    }

    #[test]
    fn decision_requires_open_offer() {
        let intake = CommandIntake::new();
        intake.request_start().unwrap();
        intake.take_lifecycle();
        assert!(intake.resolve_minor_prize_offer(true).is_err());
        assert!(intake.open_offer());
        assert!(intake.resolve_minor_prize_offer(false).is_ok());
        assert!(intake.resolve_minor_prize_offer(true).is_err());
        assert_eq!(intake.take_decision(), Some(PrizeDecision::Decline));
        assert_eq!(intake.take_decision(), None);
    }

    #[test]
    fn offer_is_withheld_behind_a_pending_stop() {
        let intake = CommandIntake::new();
        intake.request_start().unwrap();
        intake.take_lifecycle();
        intake.request_stop().unwrap();
        assert!(!intake.open_offer());
        assert!(!intake.is_offer_open());

        // Still withheld when a new game has already been requested.
        intake.request_start().unwrap();
        assert!(!intake.open_offer());
        assert!(intake.resolve_minor_prize_offer(true).is_err());
    }

    #[test]
    fn engine_end_keeps_a_queued_restart() {
        let intake = CommandIntake::new();
        intake.request_start().unwrap();
        intake.take_lifecycle();
        intake.request_stop().unwrap();
        intake.request_start().unwrap();
        intake.end_game();
        assert!(intake.is_in_progress());
        assert!(intake.take_lifecycle().start);
    }

    #[test]
    fn engine_end_clears_progress_and_offer() {
        let intake = CommandIntake::new();
        intake.request_start().unwrap();
        intake.take_lifecycle();
        assert!(intake.open_offer());
        intake.end_game();
        assert!(!intake.is_in_progress());
        assert!(!intake.is_offer_open());
    }

    #[test]
    fn clones_share_state() {
        let a = CommandIntake::new();
        let b = a.clone();
        a.request_start().unwrap();
        assert!(b.is_in_progress());
        assert!(b.take_lifecycle().start);
    }

    #[test]
    fn error_displays_reason() {
        let e = EngineError::InvalidOperation("game already stopped");
        assert_eq!(e.to_string(), "invalid operation: game already stopped");
    }
}
