//! Terminal dashboard with the break overlay and settings editor.

use std::io::{self, Stdout};
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use breaktime_app::{BreakHandle, BreakService, PresentationEvent, ServiceOptions};
use breaktime_core::SettingsStore;
use crossterm::{
    event::{self, Event as CrosstermEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tracing::subscriber::NoSubscriber;

use crate::config::{Config, KeyBindingsConfig};

pub mod constants;
mod handlers;
mod settings_form;
mod view;
mod widgets;

use self::constants::TUI_TICK_RATE_MS;
use self::view::Ui;

/// Launch the interactive TUI. Work timers start immediately.
pub fn run<S>(settings: S, config: Config, base_dir: &Path) -> Result<()>
where
    S: SettingsStore + Send + 'static,
{
    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    let (presenter, events) = mpsc::unbounded_channel();
    let options = ServiceOptions {
        presenter: Some(presenter),
        hooks: config.hook_runner(base_dir),
        bell: config.notify.bell,
        autostart: true,
    };
    let (handle, task) = {
        let _guard = runtime.enter();
        BreakService::spawn(settings, options)
    };

    let result = run_terminal(handle.clone(), events, config.tui.keybindings);

    handle.shutdown();
    runtime
        .block_on(task)
        .context("break service task failed")?;
    result
}

fn run_terminal(
    handle: BreakHandle,
    events: mpsc::UnboundedReceiver<PresentationEvent>,
    keybindings: KeyBindingsConfig,
) -> Result<()> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor()?;

    let result = tracing::subscriber::with_default(NoSubscriber::default(), || {
        let ui = Ui::new(handle, Some(events), keybindings);
        run_event_loop(&mut terminal, ui)
    });

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    mut ui: Ui<BreakHandle>,
) -> Result<()> {
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(TUI_TICK_RATE_MS);

    loop {
        terminal.draw(|f| ui.draw(f))?;
        if ui.should_quit {
            break;
        }

        let timeout = tick_rate.checked_sub(last_tick.elapsed()).unwrap_or_default();

        if event::poll(timeout)?
            && let CrosstermEvent::Key(key) = event::read()?
        {
            ui.handle_key(key);
        }

        if last_tick.elapsed() >= tick_rate {
            ui.tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}
