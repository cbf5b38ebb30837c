use crate::session::{GameState, MeterPhase, Session};

/// Closed set of sound cues the engine can ask for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SoundEffect {
    Type,
    Error,
    Success,
    Crash,
    GameOver,
}

/// Audio/voice output owned by whoever hosts the engine
pub trait Announcer {
    fn play_effect(&mut self, effect: SoundEffect);
    fn speak(&mut self, text: &str);
    fn is_muted(&self) -> bool;
}

/// Announcer that drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAnnouncer;

impl Announcer for SilentAnnouncer {
    fn play_effect(&mut self, _effect: SoundEffect) {}
    fn speak(&mut self, _text: &str) {}
    fn is_muted(&self) -> bool {
        true
    }
}

fn combo_callout(combo: u32) -> Option<&'static str> {
    [
        (50, "Unstoppable!"),
        (30, "Excellent!"),
        (20, "Great!"),
        (10, "Good!"),
    ]
    .iter()
    .find(|(every, _)| combo % every == 0)
    .map(|(_, line)| *line)
}

/// Turns changes between successive session snapshots into spoken lines.
#[derive(Debug, Clone)]
pub struct Callouts {
    last_combo: u32,
    last_level: u32,
    last_phase: MeterPhase,
    last_state: GameState,
}

impl Callouts {
    pub fn new() -> Self {
        Self {
            last_combo: 0,
            last_level: 0,
            last_phase: MeterPhase::Ice,
            last_state: GameState::Idle,
        }
    }

    pub fn observe(&mut self, session: &Session) -> Vec<String> {
        let mut lines = Vec::new();

        if session.combo > 0 && session.combo != self.last_combo {
            if let Some(line) = combo_callout(session.combo) {
                lines.push(line.to_string());
            }
        }
        self.last_combo = session.combo;

        if session.level > 1 && session.level != self.last_level {
            lines.push(format!("Level {}", session.level));
            self.last_level = session.level;
        }

        let phase = session.phase();
        if phase != self.last_phase {
            match phase {
                MeterPhase::Fire => lines.push("Critical Warning".to_string()),
                MeterPhase::Water => lines.push("System Unstable".to_string()),
                MeterPhase::Ice => {}
            }
            self.last_phase = phase;
        }

        if session.state == GameState::Victory && self.last_state != GameState::Victory {
            lines.push("Mission Accomplished".to_string());
        }
        self.last_state = session.state;

        lines
    }

    /// Feed the lines for `session` to `announcer`, unless it is muted.
    pub fn announce(&mut self, session: &Session, announcer: &mut dyn Announcer) {
        let lines = self.observe(session);
        if announcer.is_muted() {
            return;
        }
        for line in lines {
            announcer.speak(&line);
        }
    }
}

impl Default for Callouts {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        lines: Vec<String>,
        muted: bool,
    }

    impl Announcer for Recorder {
        fn play_effect(&mut self, _effect: SoundEffect) {}
        fn speak(&mut self, text: &str) {
            self.lines.push(text.to_string());
        }
        fn is_muted(&self) -> bool {
            self.muted
        }
    }

    #[test]
    fn test_sound_effect_tags() {
        assert_eq!(SoundEffect::Type.to_string(), "type");
        assert_eq!(SoundEffect::GameOver.to_string(), "gameover");
    }

    #[test]
    fn test_combo_milestones() {
        assert_eq!(combo_callout(10), Some("Good!"));
        assert_eq!(combo_callout(20), Some("Great!"));
        assert_eq!(combo_callout(30), Some("Excellent!"));
        assert_eq!(combo_callout(60), Some("Excellent!"));
        assert_eq!(combo_callout(100), Some("Unstoppable!"));
        assert_eq!(combo_callout(7), None);
    }

    #[test]
    fn test_combo_announced_once() {
        let mut callouts = Callouts::new();
        let mut s = Session::default();
        s.combo = 10;
        assert_eq!(callouts.observe(&s), vec!["Good!".to_string()]);
        assert!(callouts.observe(&s).is_empty());
    }

    #[test]
    fn test_level_and_phase_changes() {
        let mut callouts = Callouts::new();
        let mut s = Session::default();
        assert!(callouts.observe(&s).is_empty());

        s.level = 2;
        s.glitch_meter = 40.0;
        assert_eq!(
            callouts.observe(&s),
            vec!["Level 2".to_string(), "System Unstable".to_string()]
        );

        s.glitch_meter = 80.0;
        assert_eq!(callouts.observe(&s), vec!["Critical Warning".to_string()]);

        s.glitch_meter = 0.0;
        assert!(callouts.observe(&s).is_empty());
    }

    #[test]
    fn test_victory() {
        let mut callouts = Callouts::new();
        let mut s = Session::default();
        s.state = GameState::Victory;
        assert_eq!(callouts.observe(&s), vec!["Mission Accomplished".to_string()]);
        assert!(callouts.observe(&s).is_empty());
    }

    #[test]
    fn test_muted_announcer_hears_nothing_but_state_advances() {
        let mut callouts = Callouts::new();
        let mut rec = Recorder {
            muted: true,
            ..Default::default()
        };
        let mut s = Session::default();
        s.level = 3;
        callouts.announce(&s, &mut rec);
        assert!(rec.lines.is_empty());

        rec.muted = false;
        callouts.announce(&s, &mut rec);
        assert!(rec.lines.is_empty());

        s.level = 4;
        callouts.announce(&s, &mut rec);
        assert_eq!(rec.lines, vec!["Level 4".to_string()]);
    }

    #[test]
    fn test_silent_announcer_swallows_everything() {
        let mut callouts = Callouts::new();
        let mut silent = SilentAnnouncer;
        assert!(silent.is_muted());

        let mut s = Session::default();
        s.level = 2;
        s.glitch_meter = 90.0;
        silent.play_effect(SoundEffect::Crash);
        callouts.announce(&s, &mut silent);
        // already consumed, even though nobody heard it
        assert!(callouts.observe(&s).is_empty());
    }
}
