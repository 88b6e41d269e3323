/// Events emitted during a simulation tick, in the order they happened.
/// The presentation layer consumes these for rendering and sound.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameEvent {
    /// One grid cell changed value.
    TileChanged { x: usize, y: usize, occupied: bool },
    GameStarted,
    LevelEntered { level: usize, width: usize, speed: u32 },
    /// Placement succeeded; `survivors` cells stayed in the row.
    BlockPlaced { level: usize, survivors: usize },
    Lost { level: usize },
    /// Game progression is paused until the offer is resolved.
    MinorPrizeOffer,
    MinorPrizeClaimed,
    MajorPrizeWon,
    /// The game was stopped on request.
    Stopped,
}

impl GameEvent {
    /// Does this event end the running game?
    pub fn ends_game(&self) -> bool {
        matches!(
            self,
            GameEvent::Lost { .. }
                | GameEvent::MinorPrizeClaimed
                | GameEvent::MajorPrizeWon
                | GameEvent::Stopped
        )
    }
}
