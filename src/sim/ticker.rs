/// Fixed-cadence driver: owns the engine on a background thread.
///
/// The ticker calls `GameEngine::tick()` once per period and forwards every
/// event to the UI over a channel. Stopping (or dropping) the ticker raises
/// the shutdown flag and joins the thread. The thread also exits on its own
/// once the receiving side of the channel is gone.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, warn};

use super::engine::GameEngine;
use super::event::GameEvent;

pub struct Ticker {
    shutdown: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn spawn(engine: GameEngine, period: Duration, sink: Sender<GameEvent>) -> io::Result<Self> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&shutdown);
        let handle = thread::Builder::new()
            .name("stacker-ticker".into())
            .spawn(move || run(engine, period, sink, &flag))?;
        debug!("ticker started ({} ms period)", period.as_millis());
        Ok(Ticker { shutdown, handle: Some(handle) })
    }

    pub fn stop(mut self) {
        self.halt();
    }

    fn halt(&mut self) {
        self.shutdown.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("ticker thread panicked");
            }
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.halt();
    }
}

fn run(mut engine: GameEngine, period: Duration, sink: Sender<GameEvent>, shutdown: &AtomicBool) {
    let mut next = Instant::now();
    while !shutdown.load(Ordering::Acquire) {
        for event in engine.tick() {
            if event.ends_game() {
                debug!("game over: {event:?}");
            }
            if sink.send(event).is_err() {
                debug!("event sink closed, ticker exiting");
                return;
            }
        }

        // Fixed-rate schedule; if we fall behind, resync instead of bursting.
        next += period;
        let now = Instant::now();
        if next > now {
            thread::sleep(next - now);
        } else {
            next = now;
        }
    }
    debug!("ticker stopped after {} ticks", engine.tick_count());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn ticker_drives_engine_and_stops() {
        let engine = GameEngine::new();
        let intake = engine.intake();
        let (tx, rx) = mpsc::channel();
        let ticker = Ticker::spawn(engine, Duration::from_millis(1), tx).unwrap();

        intake.request_start().unwrap();
        let first = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(first, GameEvent::GameStarted);

        ticker.stop();
        // Sender was moved into the thread; once joined, the channel drains and closes.
        while rx.recv_timeout(Duration::from_secs(2)).is_ok() {}
    }

    #[test]
    fn ticker_exits_when_sink_is_dropped() {
        let engine = GameEngine::new();
        let intake = engine.intake();
        let (tx, rx) = mpsc::channel();
        let ticker = Ticker::spawn(engine, Duration::from_millis(1), tx).unwrap();
        drop(rx);
        intake.request_start().unwrap();
        // Join must not hang even though nobody listens.
        ticker.stop();
    }
}
