/// The game engine: advances the stacker by one tick.
///
/// Processing order inside `tick()`:
///   1. Stop request
///   2. Start request (clear board, reset to level 0)
///   3. Prize decision (while an offer is outstanding, nothing else runs)
///   4. Level entry (paint the fresh block)
///   5. Slide, gated by `tick_count % speed == 0`
///   6. Placement (trim, lose / advance / prize)
///   7. `tick_count += 1`
///
/// The engine owns the grid exclusively. Commands arrive through
/// `CommandIntake`; every grid write is reported as a `TileChanged` event.

use log::{debug, info};

use crate::domain::block::{Block, Direction};
use crate::domain::grid::Grid;
use crate::domain::level;
use crate::domain::rules::{self, Advance};
use super::command::{CommandIntake, PrizeDecision};
use super::event::GameEvent;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Idle,
    LevelEntering,
    LevelSliding,
    /// Minor prize offered; progression waits for the player's answer.
    AwaitingPrizeDecision,
}

pub struct GameEngine {
    grid: Grid,
    intake: CommandIntake,
    phase: Phase,
    level: usize,
    block: Block,
    speed: u32,
    tick_count: u64,
}

impl GameEngine {
    pub fn new() -> Self {
        GameEngine::with_intake(CommandIntake::new())
    }

    pub fn with_intake(intake: CommandIntake) -> Self {
        GameEngine {
            grid: Grid::new(),
            intake,
            phase: Phase::Idle,
            level: 0,
            block: Block::new(level::width(0)),
            speed: level::speed(0),
            tick_count: 0,
        }
    }

    /// A handle the command source can keep on another thread.
    pub fn intake(&self) -> CommandIntake {
        self.intake.clone()
    }

    #[allow(dead_code)]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[allow(dead_code)]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[allow(dead_code)]
    pub fn level(&self) -> usize {
        self.level
    }

    #[allow(dead_code)]
    pub fn block(&self) -> Block {
        self.block
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

impl GameEngine {
    pub fn tick(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();

        // A stop/start pair sent during the previous tick arrives together:
        // the old game ends before the new one begins.
        let lifecycle = self.intake.take_lifecycle();
        if lifecycle.stop && self.phase != Phase::Idle {
            info!("game stopped at level {}", self.level);
            self.phase = Phase::Idle;
            events.push(GameEvent::Stopped);
        }
        if lifecycle.start {
            self.begin_game(&mut events);
        }

        let place = self.intake.take_place();

        match self.phase {
            Phase::Idle => return events,
            Phase::AwaitingPrizeDecision => {
                self.resolve_decision(&mut events);
                return events;
            }
            Phase::LevelEntering => self.enter_level(&mut events),
            Phase::LevelSliding => {}
        }

        if self.tick_count % u64::from(self.speed) == 0 {
            self.slide(&mut events);
        }

        if place && !self.place_block(&mut events) {
            return events;
        }

        self.tick_count += 1;
        events
    }
}

// ══════════════════════════════════════════════════════════════
// State transitions
// ══════════════════════════════════════════════════════════════

impl GameEngine {
    fn set_tile(&mut self, x: usize, y: usize, occupied: bool, events: &mut Vec<GameEvent>) {
        if self.grid.set(x, y, occupied) {
            events.push(GameEvent::TileChanged { x, y, occupied });
        }
    }

    fn begin_game(&mut self, events: &mut Vec<GameEvent>) {
        for (x, y) in self.grid.occupied_cells().collect::<Vec<_>>() {
            events.push(GameEvent::TileChanged { x, y, occupied: false });
        }
        self.grid.clear();

        self.level = 0;
        self.tick_count = 0;
        self.block = Block::new(level::width(0));
        self.phase = Phase::LevelEntering;

        info!("game started");
        events.push(GameEvent::GameStarted);
    }

    fn enter_level(&mut self, events: &mut Vec<GameEvent>) {
        let width = level::width(self.level);
        self.block = Block::new(width);
        for x in self.block.columns() {
            self.set_tile(x, self.level, true, events);
        }
        self.speed = level::speed(self.level);
        self.phase = Phase::LevelSliding;

        debug!("entered level {} (width {}, speed {})", self.level, width, self.speed);
        events.push(GameEvent::LevelEntered { level: self.level, width, speed: self.speed });
    }

    fn slide(&mut self, events: &mut Vec<GameEvent>) {
        self.block.direction = rules::bounce(&self.block);
        let row = self.level;
        for (x, occupied) in self.block.slide() {
            self.set_tile(x, row, occupied, events);
        }
    }

    /// Resolve a placement. Returns false if the game ended.
    fn place_block(&mut self, events: &mut Vec<GameEvent>) -> bool {
        let level = self.level;
        for x in rules::overhanging_columns(&self.grid, &self.block, level) {
            self.set_tile(x, level, false, events);
        }

        if rules::is_lost(&self.grid, level) {
            info!("lost at level {level}");
            events.push(GameEvent::Lost { level });
            self.finish();
            return false;
        }

        let survivors = self.grid.count_occupied(level);
        debug!("placed at level {level}: {survivors} cell(s) survive");
        events.push(GameEvent::BlockPlaced { level, survivors });

        self.level += 1;
        self.block.direction = Direction::Right;
        self.phase = Phase::LevelEntering;

        match rules::classify_advance(self.level) {
            Advance::NextLevel => true,
            Advance::MinorPrizeOffer => {
                self.phase = Phase::AwaitingPrizeDecision;
                if self.intake.open_offer() {
                    info!("minor prize offered at level {}", self.level);
                    events.push(GameEvent::MinorPrizeOffer);
                } else {
                    debug!("stop pending, minor prize offer withheld");
                }
                true
            }
            Advance::MajorPrizeWon => {
                info!("major prize won");
                events.push(GameEvent::MajorPrizeWon);
                self.finish();
                false
            }
        }
    }

    fn resolve_decision(&mut self, events: &mut Vec<GameEvent>) {
        match self.intake.take_decision() {
            Some(PrizeDecision::Accept) => {
                info!("minor prize claimed");
                events.push(GameEvent::MinorPrizeClaimed);
                self.finish();
            }
            Some(PrizeDecision::Decline) => {
                info!("minor prize declined, continuing at level {}", self.level);
                self.phase = Phase::LevelEntering;
            }
            None => {}
        }
    }

    /// Return to Idle after the engine itself ended the game.
    fn finish(&mut self) {
        self.phase = Phase::Idle;
        self.intake.end_game();
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        GameEngine::new()
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
