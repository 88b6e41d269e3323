/// Keyboard input tracker.
///
/// The stacker only has one-shot commands, so every action is edge-triggered:
/// a key counts once when it goes down. Auto-repeat and Release events are
/// dropped, so holding the button never places twice.

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub struct InputState {
    /// Keys pressed during the most recent `drain_events()` call.
    fresh_presses: Vec<KeyCode>,

    /// Raw key events collected during drain, for modifier checks.
    raw_events: Vec<KeyEvent>,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            fresh_presses: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
        }
    }

    /// Drain all pending terminal events without blocking.
    /// Call this once per frame.
    pub fn drain_events(&mut self) {
        self.fresh_presses.clear();
        self.raw_events.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.record(key);
            }
        }
    }

    fn record(&mut self, key: KeyEvent) {
        self.raw_events.push(key);
        if key.kind == KeyEventKind::Press && !self.fresh_presses.contains(&key.code) {
            self.fresh_presses.push(key.code);
        }
    }

    /// Was this key freshly pressed this frame?
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.fresh_presses.contains(&code)
    }

    /// Convenience: was any of these keys freshly pressed?
    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.was_pressed(*c))
    }

    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, kind)
    }

    #[test]
    fn press_is_recorded_once() {
        let mut input = InputState::new();
        input.record(key(KeyCode::Char(' '), KeyEventKind::Press));
        input.record(key(KeyCode::Char(' '), KeyEventKind::Press));
        assert!(input.was_pressed(KeyCode::Char(' ')));
        assert_eq!(input.fresh_presses.len(), 1);
    }

    #[test]
    fn repeat_and_release_are_ignored() {
        let mut input = InputState::new();
        input.record(key(KeyCode::Enter, KeyEventKind::Repeat));
        input.record(key(KeyCode::Enter, KeyEventKind::Release));
        assert!(!input.any_pressed(&[KeyCode::Enter]));
    }

    #[test]
    fn ctrl_c_detected() {
        let mut input = InputState::new();
        input.record(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(input.ctrl_c_pressed());
    }
}
