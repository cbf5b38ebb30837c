//! The game state machine.
//!
//! One owned [`Engine`] is driven from a single event loop: keystrokes through
//! [`Engine::handle_input`] and frames through [`Engine::tick`]. Each call runs to
//! completion, so a keystroke is fully applied before the next frame decays the
//! word timer.

use std::time::Duration;

use log::{debug, info};

use crate::announcer::SoundEffect;
use crate::content::{fallback::LAST_RESORT, split_words};
use crate::glitch;
use crate::queue::ParagraphQueue;
use crate::session::{GameState, Session, MAX_LEVEL, METER_MAX, STARTING_LIVES, TIMER_FULL};
use crate::typing_policy::{judge, Key, Verdict};

pub const MISTAKE_PENALTY: f64 = 5.0;
pub const TIMEOUT_PENALTY: f64 = 20.0;
pub const COMPLETION_RECOVERY: f64 = 10.0;
pub const ROTATION_STEP: f64 = 15.0;
/// Decay pauses while the last keystroke is at most this recent
pub const GRACE_MS: f64 = 1000.0;

/// Word timer decay, in percent per millisecond.
///
/// Linear in the level, except the final level which runs at the flat base rate.
pub fn decay_rate(level: u32) -> f64 {
    if level >= MAX_LEVEL {
        0.02
    } else {
        0.02 + level as f64 * 0.002
    }
}

pub type SoundHook = Box<dyn FnMut(SoundEffect)>;

pub struct Engine {
    session: Session,
    queue: ParagraphQueue,
    initial_level: u32,
    /// Engine time in ms, advanced only by `tick`
    clock_ms: f64,
    last_input_ms: Option<f64>,
    /// The next frame after a level's first keystroke contributes no decay
    reanchor: bool,
    on_sound: Option<SoundHook>,
}

impl Engine {
    pub fn new(queue: ParagraphQueue, initial_level: u32) -> Self {
        let initial_level = initial_level.clamp(1, MAX_LEVEL);
        Self {
            session: Session::new(initial_level),
            queue,
            initial_level,
            clock_ms: 0.0,
            last_input_ms: None,
            reanchor: false,
            on_sound: None,
        }
    }

    pub fn with_sound<F>(mut self, hook: F) -> Self
    where
        F: FnMut(SoundEffect) + 'static,
    {
        self.on_sound = Some(Box::new(hook));
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn queue(&self) -> &ParagraphQueue {
        &self.queue
    }

    pub fn initial_level(&self) -> u32 {
        self.initial_level
    }

    /// Whether the timing loop is live
    pub fn is_running(&self) -> bool {
        self.session.is_playing()
    }

    /// On-screen form of word `index` at the current level
    pub fn display_word(&self, index: usize) -> Option<String> {
        self.session
            .words
            .get(index)
            .map(|w| glitch::display_word(self.session.level, w, index))
    }

    fn emit(&mut self, effect: SoundEffect) {
        if let Some(hook) = self.on_sound.as_mut() {
            hook(effect);
        }
    }

    fn next_words(&mut self) -> Vec<String> {
        let paragraph = self.queue.take_or_fetch();

        let words = split_words(&paragraph);
        if words.is_empty() {
            debug!("content source returned an empty paragraph");
            return split_words(LAST_RESORT);
        }
        words
    }

    fn maintain_queue(&mut self) {
        self.queue.pump();
        if self.session.is_playing() && self.queue.refill_if_low() {
            debug!("refilling paragraph queue ({} pending)", self.queue.len());
        }
        // only a waiting player sees this; mid-game refills are invisible
        self.session.loading = !self.session.is_playing() && self.queue.is_loading();
    }

    pub fn start_game(&mut self) {
        let words = self.next_words();
        self.session = Session {
            state: GameState::Playing,
            words,
            level_started: true,
            ..Session::new(self.initial_level)
        };
        self.last_input_ms = None;
        self.reanchor = false;
        info!(
            "game started at level {} with {} words",
            self.session.level,
            self.session.words.len()
        );
        self.maintain_queue();
    }

    /// Fresh paragraph for the current level, keeping level, lives and score.
    pub fn restart_level(&mut self) {
        if !self.session.is_playing() {
            return;
        }
        let words = self.next_words();
        let s = &mut self.session;
        s.words = words;
        s.word_index = 0;
        s.input.clear();
        s.combo = 0;
        s.glitch_meter = 0.0;
        s.word_timer = TIMER_FULL;
        s.level_started = false;
        s.show_space_hint = false;
        s.errors_in_word = 0;
        s.pristine_streak = 0;
        s.rotation = 0.0;
        self.reanchor = false;
        info!("level {} restarted", s.level);
        self.maintain_queue();
    }

    pub fn return_to_idle(&mut self) {
        self.session.state = GameState::Idle;
        self.session.input.clear();
        self.session.show_space_hint = false;
        self.reanchor = false;
        debug!("returned to idle");
    }

    /// Feed one key, named the way the front end names it.
    pub fn handle_input(&mut self, key: &str) {
        self.handle_key(Key::parse(key));
    }

    pub fn handle_key(&mut self, key: Key) {
        if !self.session.is_playing() {
            return;
        }

        self.last_input_ms = Some(self.clock_ms);
        if !self.session.level_started {
            self.session.level_started = true;
            self.reanchor = true;
        }

        match key {
            Key::Backspace => {
                self.session.input.pop();
                self.session.show_space_hint = false;
            }
            Key::Char(c) => self.handle_char(c),
            Key::Other => {}
        }
    }

    fn handle_char(&mut self, c: char) {
        let Some(target) = self.session.current_word() else {
            return;
        };
        let verdict = judge(
            &self.session.input,
            target,
            c,
            self.session.is_last_word(),
        );

        match verdict {
            Verdict::Complete => {
                self.session.show_space_hint = false;
                self.complete_word();
            }
            Verdict::Accept { completes } => {
                self.session.input.push(c);
                self.session.show_space_hint = false;
                self.emit(SoundEffect::Type);
                if completes {
                    self.complete_word();
                }
            }
            Verdict::Mistake { space_hint } => {
                if space_hint {
                    self.session.show_space_hint = true;
                }
                self.register_mistake();
            }
        }
    }

    fn apply_rotation_penalty(&mut self) {
        if self.session.level == MAX_LEVEL {
            self.session.rotation = (self.session.rotation + ROTATION_STEP) % 360.0;
        }
    }

    fn register_mistake(&mut self) {
        self.emit(SoundEffect::Error);
        let s = &mut self.session;
        s.errors += 1;
        s.errors_in_word += 1;
        s.combo = 0;
        s.pristine_streak = 0;
        self.apply_rotation_penalty();
        self.raise_meter(MISTAKE_PENALTY);
    }

    fn complete_word(&mut self) {
        self.emit(SoundEffect::Success);
        let s = &mut self.session;
        s.score += 10 * (u64::from(s.combo) + 1);
        s.combo += 1;
        s.glitch_meter = (s.glitch_meter - COMPLETION_RECOVERY).max(0.0);
        s.word_timer = TIMER_FULL;
        s.input.clear();

        if s.level == MAX_LEVEL {
            if s.errors_in_word == 0 {
                s.pristine_streak += 1;
                if s.pristine_streak >= 2 {
                    s.rotation = 0.0;
                    s.pristine_streak = 0;
                } else {
                    s.rotation /= 2.0;
                }
            } else {
                s.pristine_streak = 0;
            }
        }
        s.errors_in_word = 0;

        if !s.is_last_word() {
            s.word_index += 1;
            return;
        }

        let words = self.next_words();
        let s = &mut self.session;
        s.words = words;
        s.word_index = 0;

        if s.level >= MAX_LEVEL {
            s.state = GameState::Victory;
            info!("victory with score {}", s.score);
        } else {
            s.level += 1;
            s.level_started = false;
            s.word_timer = TIMER_FULL;
            info!("advanced to level {}", s.level);
        }
        self.maintain_queue();
    }

    fn handle_timeout(&mut self) {
        self.emit(SoundEffect::Error);
        let s = &mut self.session;
        s.combo = 0;
        s.show_space_hint = false;
        s.errors_in_word = 0;
        s.pristine_streak = 0;
        s.word_index = s.word_index.saturating_sub(1);
        s.input.clear();
        s.word_timer = TIMER_FULL;
        debug!("word timed out, back to word {}", s.word_index);
        self.apply_rotation_penalty();
        self.raise_meter(TIMEOUT_PENALTY);
    }

    fn raise_meter(&mut self, amount: f64) {
        self.session.glitch_meter = (self.session.glitch_meter + amount).clamp(0.0, METER_MAX);
        self.check_overflow();
    }

    fn check_overflow(&mut self) {
        if self.session.glitch_meter < METER_MAX {
            return;
        }
        self.session.lives = self.session.lives.saturating_sub(1);
        if self.session.lives == 0 {
            self.session.state = GameState::Crashed;
            info!("crashed at level {} with score {}", self.session.level, self.session.score);
            self.emit(SoundEffect::Crash);
            self.emit(SoundEffect::GameOver);
        } else {
            self.session.glitch_meter = 0.0;
            debug!("life lost, {} of {} left", self.session.lives, STARTING_LIVES);
            self.emit(SoundEffect::Crash);
        }
    }

    /// Advance one frame by `dt` of real time.
    pub fn tick(&mut self, dt: Duration) {
        self.maintain_queue();
        if !self.session.is_playing() {
            return;
        }

        let dt_ms = dt.as_secs_f64() * 1000.0;
        self.clock_ms += dt_ms;

        if std::mem::take(&mut self.reanchor) || !self.session.level_started {
            return;
        }
        let typing = self
            .last_input_ms
            .is_some_and(|at| self.clock_ms - at <= GRACE_MS);
        if typing {
            return;
        }

        let next = self.session.word_timer - decay_rate(self.session.level) * dt_ms;
        if next <= 0.0 {
            self.handle_timeout();
            self.session.word_timer = TIMER_FULL;
        } else {
            self.session.word_timer = next;
        }
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("session", &self.session)
            .field("queue", &self.queue)
            .field("clock_ms", &self.clock_ms)
            .finish()
    }
}
