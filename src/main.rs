use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    Terminal,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    path::PathBuf,
    sync::Mutex,
};
use tracing::info;
use tracing_subscriber::EnvFilter;
use welder::{
    app::App,
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    quality::Band,
    runtime::{CrosstermEventSource, FixedTicker, Runner, WeldEvent},
};

/// terminal weld-bead trainer
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Lay a virtual weld bead with the mouse. Travel speed and weave frequency are scored against ideal bands while the torch position is scored against a sinusoidal guide."
)]
pub struct Cli {
    /// lower bound of the ideal travel speed (mm/s)
    #[clap(long)]
    speed_min: Option<f64>,

    /// upper bound of the ideal travel speed (mm/s)
    #[clap(long)]
    speed_max: Option<f64>,

    /// lower bound of the ideal weave frequency (Hz)
    #[clap(long)]
    freq_min: Option<f64>,

    /// upper bound of the ideal weave frequency (Hz)
    #[clap(long)]
    freq_max: Option<f64>,

    /// allowed distance from the guide wave (px)
    #[clap(short = 't', long)]
    tolerance: Option<f64>,

    /// plate width (px)
    #[clap(long)]
    width: Option<f64>,

    /// plate height (px); the guide is re-centered on it
    #[clap(long)]
    height: Option<f64>,

    /// settings file to use instead of the default location
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// write the effective settings back to the settings file
    #[clap(long)]
    save_config: bool,

    /// enable debug-level logging
    #[clap(short = 'v', long)]
    verbose: bool,

    /// log file (defaults to the state directory)
    #[clap(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Layer the command line overrides on top of a loaded config
    fn apply(&self, mut cfg: Config) -> Config {
        cfg.speed_band = Band::new(
            self.speed_min.unwrap_or(cfg.speed_band.min),
            self.speed_max.unwrap_or(cfg.speed_band.max),
        );
        cfg.frequency_band = Band::new(
            self.freq_min.unwrap_or(cfg.frequency_band.min),
            self.freq_max.unwrap_or(cfg.frequency_band.max),
        );
        if let Some(tolerance) = self.tolerance {
            cfg.tracking_tolerance = tolerance;
        }
        if let Some(width) = self.width {
            cfg.canvas_width = width;
        }
        if let Some(height) = self.height {
            cfg.canvas_height = height;
            cfg.center_y = height / 2.0;
        }
        cfg
    }

    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyAction {
    Quit,
    Restart,
    Ignore,
}

fn key_action(key: KeyEvent) -> KeyAction {
    if key.kind != KeyEventKind::Press {
        return KeyAction::Ignore;
    }
    match key.code {
        KeyCode::Esc => KeyAction::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
        KeyCode::Char('r') => KeyAction::Restart,
        _ => KeyAction::Ignore,
    }
}

/// Logs go to a file; the terminal belongs to the UI.
fn init_logging(cli: &Cli) {
    let Some(path) = cli.log_file.clone().or_else(AppDirs::log_path) else {
        return;
    };
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(&cli);

    let store = cli.config_store();
    let (loaded, load_error) = store.load_with_fallback();
    let config = cli.apply(loaded);
    if let Err(e) = config.validate() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::ValueValidation, e).exit();
    }
    if cli.save_config {
        // never replace a file we could not read with defaults
        if let Some(e) = load_error {
            let mut cmd = Cli::command();
            cmd.error(
                ErrorKind::Io,
                format!("not overwriting {}: {e}", store.path().display()),
            )
            .exit();
        }
        store.save(&config)?;
        info!(path = %store.path().display(), "settings saved");
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config);
    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn refresh_viewport<B: Backend>(terminal: &Terminal<B>, app: &mut App) -> io::Result<()> {
    let size = terminal.size()?;
    app.set_viewport(Rect::new(0, 0, size.width, size.height));
    Ok(())
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());

    refresh_viewport(terminal, app)?;
    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    loop {
        match runner.step() {
            WeldEvent::Tick => {}
            WeldEvent::Resize => refresh_viewport(terminal, app)?,
            WeldEvent::Pointer { column, row } => {
                app.on_pointer(column, row);
            }
            WeldEvent::Key(key) => match key_action(key) {
                KeyAction::Quit => break,
                KeyAction::Restart => app.restart(),
                KeyAction::Ignore => {}
            },
        }
        // guide and trail are redrawn from committed state every step
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;
    }

    Ok(())
}
