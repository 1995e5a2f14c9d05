mod config;
mod entity;
mod game;
mod group;
mod schedule;
mod snake;
mod surface;
mod term;
mod vector;
mod wall;

use std::{fs::File, path::Path, thread::sleep, time::{Duration, Instant}};

use anyhow::Context;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::{info, warn};
use simplelog::{Config, LevelFilter, WriteLogger};

use crate::config::{GameConfig, Options};
use crate::game::Game;
use crate::term::TermManager;

pub type TermInt = u16;
pub type Coords = (u16, u16);

const POLL_INTERVAL_MS: u64 = 5;

const INTRO: &[&str] = &[
    "Arrow keys or WASD to move",
    "CTRL+C to quit",
    "",
    "Press any key to begin",
];
const HELP_STATUS: &str = "Arrow keys or WASD to move, CTRL+C to quit";
const GAME_OVER_STATUS: &str = "Press any key to play again, or CTRL+C to quit.";

enum Outcome {
    Over,
    Quit,
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        report_restore(TermManager::restore());
    }
}

/// Logs a failed terminal restore. Returns whether the restore went through.
fn report_restore(result: crossterm::Result<()>) -> bool {
    match result {
        Ok(()) => true,
        Err(err) => {
            warn!("Could not restore the terminal: {}", err);
            false
        }
    }
}

fn main() -> anyhow::Result<()> {
    let options = Options::parse();
    init_logging(options.log_file.as_deref())?;

    let mut term = TermManager::new().context("Error reading terminal size")?;
    let config = options.to_config(Some(term.visible_cells())).context("Invalid game options")?;

    let _guard = TerminalGuard;
    term.setup().context("Error setting up the terminal")?;

    run(&mut term, &config)
}

fn init_logging(path: Option<&Path>) -> anyhow::Result<()> {
    // The terminal is in raw mode while playing, so logs only ever go to a file
    if let Some(path) = path {
        let file = File::create(path).with_context(|| format!("Error creating log file {}", path.display()))?;
        WriteLogger::init(LevelFilter::Debug, Config::default(), file).context("Error installing the logger")?;
    }
    Ok(())
}

fn run(term: &mut TermManager, config: &GameConfig) -> anyhow::Result<()> {
    if !term.set_field(config.width, config.height, config.block_size) {
        warn!(
            "Field of {:?} cells does not fit the {:?} terminal and will be clipped",
            config.cells(),
            term.get_terminal_size()
        );
    }

    term.show_message(INTRO)?;
    if is_ctrl_c(&term.read_key_blocking()?) {
        return Ok(());
    }

    loop {
        // The main game loop takes care of exiting cleanly on CTRL+C
        if let Outcome::Quit = play(term, config)? {
            info!("Quit during play");
            return Ok(());
        }

        term.print_status(GAME_OVER_STATUS)?;
        if is_ctrl_c(&term.read_key_blocking()?) {
            return Ok(());
        }
    }
}

/// Plays one game to its end. A finished game cannot restart, so every call
/// builds a fresh one.
fn play(term: &mut TermManager, config: &GameConfig) -> anyhow::Result<Outcome> {
    term.hide_message()?;
    term.clear()?;
    term.print_status(HELP_STATUS)?;

    let mut game = Game::new(config.clone(), &mut *term);
    game.start(Instant::now());

    loop {
        sleep(Duration::from_millis(POLL_INTERVAL_MS));

        for key_ev in game.surface_mut().read_key_events_queue()? {
            if is_ctrl_c(&key_ev) {
                return Ok(Outcome::Quit);
            }
            game.key_down(&key_ev);
        }

        game.pump(Instant::now())?;

        if game.is_over() {
            info!("Final head {} with size {}", game.snake().position(), game.snake().size());
            game.dispose();
            return Ok(Outcome::Over);
        }
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::ErrorKind;
    use std::io;

    #[test]
    fn failed_restore_is_reported() {
        let err = ErrorKind::IoError(io::Error::new(io::ErrorKind::BrokenPipe, "tty gone"));
        assert!(!report_restore(Err(err)));
        assert!(report_restore(Ok(())));
    }

    #[test]
    fn ctrl_c_is_recognised() {
        assert!(is_ctrl_c(&KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL }));
        assert!(!is_ctrl_c(&KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::NONE }));
    }
}
