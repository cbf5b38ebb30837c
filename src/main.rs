pub mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use glitchtype::{
    announcer::{Announcer, Callouts, SoundEffect},
    app_dirs::AppDirs,
    config::{Config, ConfigStore, ContentKind, FileConfigStore},
    content::{
        sanitize_paragraph, ContentSource, FileSource, FixedSource, SentenceSource, StaticSource,
    },
    engine::Engine,
    logging,
    queue::ParagraphQueue,
    runtime::{key_name, CrosstermEventSource, FixedTicker, FrameClock, GameEvent, Runner},
    session::{GameState, MAX_LEVEL},
};
use log::{info, warn};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin, Write},
    path::PathBuf,
    sync::{
        mpsc::{self, Receiver},
        Arc,
    },
    time::{Duration, Instant},
};

/// Paragraphs requested up front so the first level never waits
const PRIME_COUNT: usize = 5;
/// How long a spoken callout stays on screen
const BANNER_TTL: Duration = Duration::from_millis(1500);

/// typing arcade: keep the system stable by typing fast and clean
#[derive(Parser, Debug, Clone, Default)]
#[clap(
    version,
    about,
    long_about = "A typing arcade game. Words stream in, the glitch meter climbs with every mistake, and each level mutates the words a little more."
)]
pub struct Cli {
    /// level to start on
    #[clap(short = 'l', long, value_parser = clap::value_parser!(u32).range(1..=MAX_LEVEL as i64))]
    pub level: Option<u32>,

    /// custom text to type instead of generated paragraphs
    #[clap(short = 'p', long)]
    pub prompt: Option<String>,

    /// plain text file of paragraphs, separated by blank lines
    #[clap(short = 'f', long)]
    pub file: Option<PathBuf>,

    /// where paragraphs come from when no prompt or file is given
    #[clap(short = 'c', long, value_enum)]
    pub content: Option<ContentKind>,

    /// turn off the terminal bell
    #[clap(long)]
    pub mute: bool,

    /// turn off on-screen callouts
    #[clap(long)]
    pub no_callouts: bool,

    /// write the effective settings to the config file
    #[clap(long)]
    pub save_config: bool,
}

impl Cli {
    /// Flags win over the stored config
    fn merge_into(&self, mut config: Config) -> Config {
        if let Some(level) = self.level {
            config.initial_level = level;
        }
        if let Some(file) = &self.file {
            config.text_file = Some(file.clone());
        }
        if let Some(content) = self.content {
            config.content = content;
        }
        if self.mute {
            config.sound_fx = false;
        }
        if self.no_callouts {
            config.callouts = false;
        }
        config
    }
}

/// Pick the paragraph source: prompt, then file, then the configured kind.
fn build_source(prompt: Option<&str>, config: &Config) -> Arc<dyn ContentSource> {
    if let Some(prompt) = prompt {
        let cleaned = sanitize_paragraph(prompt, usize::MAX);
        if !cleaned.is_empty() {
            return Arc::new(FixedSource::new(cleaned));
        }
        warn!("custom prompt has no typeable words, ignoring it");
    }

    if let Some(path) = &config.text_file {
        match FileSource::open(path, config.max_paragraph_chars) {
            Ok(source) => return Arc::new(source),
            Err(e) => warn!("could not use {}: {}", path.display(), e),
        }
    }

    match config.content {
        ContentKind::Sentences => Arc::new(SentenceSource::new(
            config.sentences_per_paragraph,
            config.max_paragraph_chars,
        )),
        ContentKind::Builtin => Arc::new(StaticSource::new()),
    }
}

/// Bell for bad news, banner for callouts
#[derive(Debug)]
pub struct TerminalAnnouncer {
    bell: bool,
    callouts: bool,
    ring: bool,
    banner: Option<(String, Instant)>,
}

impl TerminalAnnouncer {
    pub fn new(bell: bool, callouts: bool) -> Self {
        Self {
            bell,
            callouts,
            ring: false,
            banner: None,
        }
    }

    /// Callout text still within its display window
    pub fn banner(&self) -> Option<&str> {
        self.banner
            .as_ref()
            .filter(|(_, at)| at.elapsed() < BANNER_TTL)
            .map(|(text, _)| text.as_str())
    }

    /// Returns true once per requested bell
    pub fn take_bell(&mut self) -> bool {
        std::mem::take(&mut self.ring)
    }
}

impl Announcer for TerminalAnnouncer {
    fn play_effect(&mut self, effect: SoundEffect) {
        if !self.bell {
            return;
        }
        match effect {
            SoundEffect::Error | SoundEffect::Crash | SoundEffect::GameOver => self.ring = true,
            SoundEffect::Type | SoundEffect::Success => {}
        }
    }

    fn speak(&mut self, text: &str) {
        self.banner = Some((text.to_string(), Instant::now()));
    }

    fn is_muted(&self) -> bool {
        !self.callouts
    }
}

pub struct App {
    pub engine: Engine,
    pub announcer: TerminalAnnouncer,
    callouts: Callouts,
    sounds: Receiver<SoundEffect>,
}

impl App {
    pub fn new(source: Arc<dyn ContentSource>, config: &Config) -> Self {
        let mut queue = ParagraphQueue::new(source);
        queue.prime(PRIME_COUNT);

        let (tx, sounds) = mpsc::channel();
        let engine = Engine::new(queue, config.initial_level).with_sound(move |effect| {
            let _ = tx.send(effect);
        });

        Self {
            engine,
            announcer: TerminalAnnouncer::new(config.sound_fx, config.callouts),
            callouts: Callouts::new(),
            sounds,
        }
    }

    /// Apply one key press. Returns false when the player asked to quit.
    pub fn on_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return key.code != KeyCode::Char('c');
        }

        match self.engine.session().state {
            GameState::Playing => match key.code {
                KeyCode::Esc => self.engine.return_to_idle(),
                KeyCode::Tab => self.engine.restart_level(),
                _ => {
                    if let Some(name) = key_name(&key) {
                        self.engine.handle_input(&name);
                    }
                }
            },
            GameState::Idle => match key.code {
                KeyCode::Esc => return false,
                KeyCode::Enter => self.start(),
                _ => {}
            },
            GameState::Crashed | GameState::Victory => match key.code {
                KeyCode::Esc => self.engine.return_to_idle(),
                KeyCode::Enter => self.start(),
                _ => {}
            },
        }
        self.sync();
        true
    }

    // Enter waits until the first paragraph has arrived
    fn start(&mut self) {
        if !self.engine.session().loading {
            self.engine.start_game();
        }
    }

    /// Advance the engine by one frame of real time
    pub fn on_frame(&mut self, dt: Duration) {
        self.engine.tick(dt);
        self.sync();
    }

    fn sync(&mut self) {
        while let Ok(effect) = self.sounds.try_recv() {
            self.announcer.play_effect(effect);
        }
        self.callouts
            .announce(self.engine.session(), &mut self.announcer);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileConfigStore::new();
    let config = cli.merge_into(store.load());

    if let Some(path) = AppDirs::log_path() {
        if let Err(e) = logging::init(&config.log_level, &path) {
            eprintln!("logging disabled: {e}");
        }
    }

    if cli.save_config {
        store.save(&config)?;
        info!("saved config to {}", store.path().display());
    }

    let source = build_source(cli.prompt.as_deref(), &config);
    let mut app = App::new(source, &config);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend + Write>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::frames());
    let mut clock = FrameClock::new();

    terminal.draw(|f| ui(app, f))?;

    loop {
        match runner.step() {
            GameEvent::Key(key) => {
                if !app.on_key(key) {
                    break;
                }
            }
            GameEvent::Resize | GameEvent::Tick => {}
        }

        app.on_frame(clock.lap());

        if app.announcer.take_bell() {
            let backend = terminal.backend_mut();
            backend.write_all(b"\x07")?;
            Write::flush(backend)?;
        }

        terminal.draw(|f| ui(app, f))?;
    }

    info!("quitting, final score {}", app.engine.session().score);
    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}
