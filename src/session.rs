use serde::Serialize;

pub const MAX_LEVEL: u32 = 6;
pub const STARTING_LIVES: u32 = 3;
pub const METER_MAX: f64 = 100.0;
pub const TIMER_FULL: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
pub enum GameState {
    Idle,
    Playing,
    Crashed,
    Victory,
}

/// Coarse band of the glitch meter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
pub enum MeterPhase {
    Ice,
    Water,
    Fire,
}

impl MeterPhase {
    pub fn from_meter(meter: f64) -> Self {
        if meter > 66.0 {
            MeterPhase::Fire
        } else if meter > 33.0 {
            MeterPhase::Water
        } else {
            MeterPhase::Ice
        }
    }
}

/// Everything the front end may read about the live game
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub state: GameState,
    pub level: u32,
    pub words: Vec<String>,
    pub word_index: usize,
    pub input: String,
    pub score: u64,
    pub combo: u32,
    pub glitch_meter: f64,
    pub lives: u32,
    pub word_timer: f64,
    pub level_started: bool,
    pub show_space_hint: bool,
    /// Out of play with no paragraph ready and a fetch under way
    pub loading: bool,
    /// Lifetime mistakes this run
    pub errors: u32,
    // Level 6 recovery
    pub errors_in_word: u32,
    pub pristine_streak: u32,
    /// Degrees, [0, 360)
    pub rotation: f64,
}

impl Session {
    pub fn new(level: u32) -> Self {
        Self {
            state: GameState::Idle,
            level,
            words: Vec::new(),
            word_index: 0,
            input: String::new(),
            score: 0,
            combo: 0,
            glitch_meter: 0.0,
            lives: STARTING_LIVES,
            word_timer: TIMER_FULL,
            level_started: false,
            show_space_hint: false,
            loading: false,
            errors: 0,
            errors_in_word: 0,
            pristine_streak: 0,
            rotation: 0.0,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.state == GameState::Playing
    }

    pub fn current_word(&self) -> Option<&str> {
        self.words.get(self.word_index).map(String::as_str)
    }

    pub fn is_last_word(&self) -> bool {
        self.word_index + 1 >= self.words.len()
    }

    pub fn phase(&self) -> MeterPhase {
        MeterPhase::from_meter(self.glitch_meter)
    }

    /// Percentage of the system still stable, as shown on the meter
    pub fn stability(&self) -> f64 {
        METER_MAX - self.glitch_meter
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_idle() {
        let s = Session::new(2);
        assert_eq!(s.state, GameState::Idle);
        assert_eq!(s.level, 2);
        assert_eq!(s.lives, STARTING_LIVES);
        assert_eq!(s.word_timer, TIMER_FULL);
        assert!(s.current_word().is_none());
        assert!(!s.is_playing());
    }

    #[test]
    fn test_meter_phases() {
        assert_eq!(MeterPhase::from_meter(0.0), MeterPhase::Ice);
        assert_eq!(MeterPhase::from_meter(33.0), MeterPhase::Ice);
        assert_eq!(MeterPhase::from_meter(33.5), MeterPhase::Water);
        assert_eq!(MeterPhase::from_meter(66.0), MeterPhase::Water);
        assert_eq!(MeterPhase::from_meter(70.0), MeterPhase::Fire);
        assert_eq!(MeterPhase::from_meter(100.0), MeterPhase::Fire);
    }

    #[test]
    fn test_word_cursor_helpers() {
        let mut s = Session::default();
        s.words = vec!["the".into(), "fox".into()];
        assert_eq!(s.current_word(), Some("the"));
        assert!(!s.is_last_word());
        s.word_index = 1;
        assert!(s.is_last_word());
    }

    #[test]
    fn test_state_display_and_json() {
        assert_eq!(GameState::Victory.to_string(), "Victory");
        let json = serde_json::to_value(Session::default()).unwrap();
        assert_eq!(json["state"], "Idle");
        assert_eq!(json["lives"], 3);
    }
}
