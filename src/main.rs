/// Entry point and front-end loop.
///
/// The engine runs on the ticker thread at the configured cadence. This
/// thread polls input, forwards commands through the `CommandIntake`, folds
/// engine events into the `Board` mirror and renders it.

mod config;
mod domain;
mod sim;
mod ui;

use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::KeyCode;

use config::GameConfig;
use sim::command::{CommandIntake, EngineError};
use sim::engine::GameEngine;
use sim::event::GameEvent;
use sim::ticker::Ticker;
use ui::board::{Board, Button};
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::sound::{self, SoundEngine};

const FRAME_SLEEP: Duration = Duration::from_millis(16);
/// How long error messages stay on screen, in frames.
const ERROR_FRAMES: u32 = 120;

fn main() {
    let config = GameConfig::load();
    init_logging(&config);
    log::info!("stacker starting, tick period {} ms", config.speed.tick_rate_ms);

    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = if config.sound { SoundEngine::new() } else { None };

    let result = game_loop(&mut renderer, sound.as_ref(), &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        log::error!("game error: {e}");
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing Stacker!");
}

/// Log to the configured file. The terminal is owned by the renderer,
/// so there is no stderr fallback.
fn init_logging(config: &GameConfig) {
    let path = match &config.log_file {
        Some(p) => p,
        None => return,
    };
    match std::fs::OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
                .target(env_logger::Target::Pipe(Box::new(file)))
                .init();
        }
        Err(e) => eprintln!("Warning: could not open log file {}: {e}", path.display()),
    }
}

fn game_loop(
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let engine = GameEngine::new();
    let intake = engine.intake();
    let (tx, rx) = mpsc::channel::<GameEvent>();
    let ticker = Ticker::spawn(engine, Duration::from_millis(config.speed.tick_rate_ms), tx)?;

    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    if gp.connected {
        log::info!("gamepad detected");
    }
    let mut board = Board::new();

    loop {
        kb.drain_events();
        gp.update();

        if kb.ctrl_c_pressed() || kb.any_pressed(KEYS_QUIT) {
            break;
        }

        if let Some(cmd) = read_command(&kb, &gp) {
            dispatch(&intake, &mut board, cmd);
        }

        let events: Vec<GameEvent> = rx.try_iter().collect();
        for event in &events {
            board.apply(event);
        }
        sound::play_events(sound, &events);

        board.tick_frame();
        renderer.render(&board)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    ticker.stop();
    log::info!("stacker exiting");
    Ok(())
}

// ── Key Constants ──

const KEYS_BUTTON: &[KeyCode] = &[KeyCode::Enter, KeyCode::Char(' ')];
const KEYS_ACCEPT: &[KeyCode] = &[KeyCode::Char('y'), KeyCode::Char('Y')];
const KEYS_DECLINE: &[KeyCode] = &[KeyCode::Char('n'), KeyCode::Char('N')];
const KEYS_STOP: &[KeyCode] = &[KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];

/// What the player asked for this frame.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Command {
    /// The START / PLACE button.
    Button,
    Accept,
    Decline,
    Stop,
}

fn read_command(kb: &InputState, gp: &GamepadState) -> Option<Command> {
    if kb.any_pressed(KEYS_BUTTON) || gp.action_pressed() {
        Some(Command::Button)
    } else if kb.any_pressed(KEYS_ACCEPT) {
        Some(Command::Accept)
    } else if kb.any_pressed(KEYS_DECLINE) || gp.decline_pressed() {
        Some(Command::Decline)
    } else if kb.any_pressed(KEYS_STOP) || gp.stop_pressed() {
        Some(Command::Stop)
    } else {
        None
    }
}

/// Forward a command to the engine. Refused commands show up as a message.
fn dispatch(intake: &CommandIntake, board: &mut Board, cmd: Command) {
    if let Err(e) = forward(intake, board, cmd) {
        log::warn!("{e}");
        board.set_message(&e.to_string(), ERROR_FRAMES);
    }
}

fn forward(intake: &CommandIntake, board: &mut Board, cmd: Command) -> Result<(), EngineError> {
    match cmd {
        // While the prize question is up, the button means "claim".
        Command::Button if intake.is_offer_open() => intake.resolve_minor_prize_offer(true),
        // The board mirror lags the engine by a frame; ask the intake.
        Command::Button if intake.is_in_progress() => {
            intake.request_place();
            Ok(())
        }
        Command::Button => {
            intake.request_start()?;
            board.button = Button::Place;
            Ok(())
        }
        Command::Accept => intake.resolve_minor_prize_offer(true),
        Command::Decline => {
            intake.resolve_minor_prize_offer(false)?;
            board.offer_open = false;
            board.message.clear();
            Ok(())
        }
        Command::Stop => intake.request_stop(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drive(engine: &mut GameEngine, board: &mut Board, ticks: usize) {
        for _ in 0..ticks {
            for ev in engine.tick() {
                board.apply(&ev);
            }
        }
    }

    #[test]
    fn button_starts_then_places() {
        let mut engine = GameEngine::new();
        let intake = engine.intake();
        let mut board = Board::new();

        dispatch(&intake, &mut board, Command::Button);
        assert_eq!(board.button, Button::Place);
        drive(&mut engine, &mut board, 1);
        assert_eq!(engine.level(), 0);

        dispatch(&intake, &mut board, Command::Button);
        drive(&mut engine, &mut board, 2);
        assert_eq!(engine.level(), 1);
        assert!(board.message.is_empty());
    }

    #[test]
    fn refused_command_becomes_message() {
        let intake = CommandIntake::new();
        let mut board = Board::new();
        dispatch(&intake, &mut board, Command::Stop);
        assert_eq!(board.message, "invalid operation: game already stopped");
        assert_eq!(board.message_timer, ERROR_FRAMES);
    }

    #[test]
    fn stop_resets_button() {
        let mut engine = GameEngine::new();
        let intake = engine.intake();
        let mut board = Board::new();
        dispatch(&intake, &mut board, Command::Button);
        drive(&mut engine, &mut board, 3);
        dispatch(&intake, &mut board, Command::Stop);
        drive(&mut engine, &mut board, 1);
        assert_eq!(board.button, Button::Start);
        assert_eq!(board.message, "Game stopped");
    }

    #[test]
    fn decline_without_offer_is_refused() {
        let intake = CommandIntake::new();
        let mut board = Board::new();
        dispatch(&intake, &mut board, Command::Decline);
        assert!(board.message.contains("no prize offer outstanding"));
    }
}
