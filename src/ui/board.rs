/// Board: the UI's read-only mirror of the game, rebuilt from engine events.
///
/// The engine never hands out its grid across threads. Instead the front end
/// replays `TileChanged` notifications into its own copy and tracks just
/// enough game status to label the button and show messages.

use crate::domain::grid::{COLS, ROWS};
use crate::sim::event::GameEvent;

/// Label of the single START / PLACE button.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Button {
    Start,
    Place,
}

impl Button {
    pub fn label(self) -> &'static str {
        match self {
            Button::Start => "START",
            Button::Place => "PLACE",
        }
    }
}

pub struct Board {
    pub cells: [[bool; COLS]; ROWS],
    pub button: Button,
    /// Highest level entered in the current (or last) game.
    pub level: usize,
    pub width: usize,
    pub speed: u32,
    /// Minor-prize question on screen.
    pub offer_open: bool,
    pub message: String,
    pub message_timer: u32,
    pub anim_tick: u32,
}

impl Board {
    pub fn new() -> Self {
        Board {
            cells: [[false; COLS]; ROWS],
            button: Button::Start,
            level: 0,
            width: 0,
            speed: 0,
            offer_open: false,
            message: String::new(),
            message_timer: 0,
            anim_tick: 0,
        }
    }

    /// Fold one engine event into the mirror.
    pub fn apply(&mut self, event: &GameEvent) {
        match *event {
            GameEvent::TileChanged { x, y, occupied } => {
                self.cells[y][x] = occupied;
            }
            GameEvent::GameStarted => {
                self.button = Button::Place;
                self.offer_open = false;
                self.message.clear();
                self.message_timer = 0;
            }
            GameEvent::LevelEntered { level, width, speed } => {
                self.level = level;
                self.width = width;
                self.speed = speed;
            }
            GameEvent::BlockPlaced { .. } => {}
            GameEvent::Lost { .. } => {
                self.end("You lose");
            }
            GameEvent::MinorPrizeOffer => {
                self.offer_open = true;
                self.set_message("Stop here and claim your minor prize?  [Y] / [N]", 0);
            }
            GameEvent::MinorPrizeClaimed => {
                self.end("Claim your minor prize.");
            }
            GameEvent::MajorPrizeWon => {
                self.end("CONGRATULATIONS, claim your major prize.");
            }
            GameEvent::Stopped => {
                self.end("Game stopped");
            }
        }
    }

    fn end(&mut self, msg: &str) {
        self.button = Button::Start;
        self.offer_open = false;
        self.set_message(msg, 0);
    }

    /// Show a message. `duration` in frames; 0 keeps it until replaced.
    pub fn set_message(&mut self, msg: &str, duration: u32) {
        self.message = msg.to_string();
        self.message_timer = duration;
    }

    /// Advance per-frame timers.
    pub fn tick_frame(&mut self) {
        self.anim_tick = self.anim_tick.wrapping_add(1);
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message.clear();
            }
        }
    }

    pub fn occupied(&self, x: usize, y: usize) -> bool {
        self.cells[y][x]
    }
}
