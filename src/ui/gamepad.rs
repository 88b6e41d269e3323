/// Gamepad input tracker using gilrs.
///
/// Button mapping is loaded from config.toml via `load_button_config()`.
/// Default mapping:
///   A / Start   →  START / PLACE (accepts a prize offer)
///   B           →  Decline a prize offer
///   Select      →  Stop the running game

#[cfg(feature = "gamepad")]
use gilrs::{Button, EventType, Gilrs};

use crate::config::GamepadConfig;

/// Logical button identifiers (one per physical button).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,       // South
    B,       // East
    X,       // West
    Y,       // North
    L1,      // LeftTrigger
    R1,      // RightTrigger
    L2,      // LeftTrigger2
    R2,      // RightTrigger2
    Start,
    Select,
}

const BTN_COUNT: usize = 10;

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH"  => Some(Btn::A),
            "B" | "EAST"   => Some(Btn::B),
            "X" | "WEST"   => Some(Btn::X),
            "Y" | "NORTH"  => Some(Btn::Y),
            "L1" | "LB" | "LEFTTRIGGER"  => Some(Btn::L1),
            "R1" | "RB" | "RIGHTTRIGGER" => Some(Btn::R1),
            "L2" | "LT" | "LEFTTRIGGER2"  => Some(Btn::L2),
            "R2" | "RT" | "RIGHTTRIGGER2" => Some(Btn::R2),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South     => Some(Btn::A),
            Button::East      => Some(Btn::B),
            Button::West      => Some(Btn::X),
            Button::North     => Some(Btn::Y),
            Button::LeftTrigger  => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::LeftTrigger2  => Some(Btn::L2),
            Button::RightTrigger2 => Some(Btn::R2),
            Button::Start     => Some(Btn::Start),
            Button::Select    => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Action-to-button mapping (loaded from config).
#[derive(Debug, PartialEq, Eq)]
struct ActionMap {
    action: Vec<Btn>,
    decline: Vec<Btn>,
    stop: Vec<Btn>,
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            action:  vec![Btn::A, Btn::Start],
            decline: vec![Btn::B],
            stop:    vec![Btn::Select],
        }
    }
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    /// Buttons that went down since the last `update()`, indexed by `Btn`.
    just_pressed: [bool; BTN_COUNT],

    action_map: ActionMap,

    pub connected: bool,
}

impl GamepadState {
    pub fn new() -> Self {
        #[cfg(feature = "gamepad")]
        let (gilrs_opt, connected) = match Gilrs::new() {
            Ok(g) => {
                let has_pad = g.gamepads().next().is_some();
                (Some(g), has_pad)
            }
            Err(e) => {
                log::warn!("gamepad support unavailable: {e}");
                (None, false)
            }
        };
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: gilrs_opt,
            just_pressed: [false; BTN_COUNT],
            action_map: ActionMap::default(),
            connected,
        }
    }

    /// Load button mapping from config. Empty or unknown lists keep the default.
    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        fn parse_list(names: &[String]) -> Vec<Btn> {
            names.iter().filter_map(|s| Btn::from_name(s)).collect()
        }
        let map = &mut self.action_map;
        let action = parse_list(&cfg.action);
        if !action.is_empty() { map.action = action; }
        let decline = parse_list(&cfg.decline);
        if !decline.is_empty() { map.decline = decline; }
        let stop = parse_list(&cfg.stop);
        if !stop.is_empty() { map.stop = stop; }
    }

    pub fn update(&mut self) {
        self.just_pressed = [false; BTN_COUNT];

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    self.connected = true;
                    if let Some(b) = Btn::from_gilrs(btn) {
                        self.just_pressed[b as usize] = true;
                    }
                }
                EventType::Connected => {
                    log::info!("gamepad connected");
                    self.connected = true;
                }
                EventType::Disconnected => {
                    log::info!("gamepad disconnected");
                    self.connected = false;
                    self.just_pressed = [false; BTN_COUNT];
                }
                _ => {}
            }
        }
    }

    // ── Action queries (config-driven) ──

    fn any_just_pressed(&self, btns: &[Btn]) -> bool {
        btns.iter().any(|&b| self.just_pressed[b as usize])
    }

    pub fn action_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.action)
    }
    pub fn decline_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.decline)
    }
    pub fn stop_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.stop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pad() -> GamepadState {
        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: None,
            just_pressed: [false; BTN_COUNT],
            action_map: ActionMap::default(),
            connected: false,
        }
    }

    #[test]
    fn button_names_are_case_insensitive() {
        assert_eq!(Btn::from_name("start"), Some(Btn::Start));
        assert_eq!(Btn::from_name("LB"), Some(Btn::L1));
        assert_eq!(Btn::from_name("back"), Some(Btn::Select));
        assert_eq!(Btn::from_name("turbo"), None);
    }

    #[test]
    fn config_overrides_only_valid_lists() {
        let mut p = pad();
        p.load_button_config(&GamepadConfig {
            action: vec!["X".into()],
            decline: vec!["nonsense".into()],
            stop: vec![],
        });
        assert_eq!(p.action_map.action, vec![Btn::X]);
        assert_eq!(p.action_map.decline, vec![Btn::B]);
        assert_eq!(p.action_map.stop, vec![Btn::Select]);
    }

    #[test]
    fn pressed_buttons_map_to_actions() {
        let mut p = pad();
        p.just_pressed[Btn::Start as usize] = true;
        assert!(p.action_pressed());
        assert!(!p.decline_pressed());
        assert!(!p.stop_pressed());
    }
}
