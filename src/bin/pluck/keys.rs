//! Keyboard control: re-pluck strings from the terminal

use color_eyre::eyre::Result as EyreResult;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal,
};
use std::time::{Duration, Instant};

use pluck_dsp::{synth::controller::Controller, PluckParams};

/// Restores the terminal even if the loop bails out early.
struct RawMode;

impl RawMode {
    fn enable() -> std::io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// What a key press asks for.
#[derive(Debug, PartialEq)]
enum Action {
    Pluck(usize),
    Quit,
    Ignore,
}

fn action_for(code: KeyCode, modifiers: KeyModifiers, voices: usize) -> Action {
    match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char(c) => match c.to_digit(10) {
            Some(d) if d >= 1 && (d as usize) <= voices => Action::Pluck(d as usize - 1),
            _ => Action::Ignore,
        },
        _ => Action::Ignore,
    }
}

/// Handle key presses until `duration` has elapsed or the user quits.
///
/// Without a terminal (e.g. output piped) this just waits out the duration.
pub fn run(
    controller: &mut Controller,
    params: &[PluckParams],
    duration: Duration,
) -> EyreResult<()> {
    let deadline = Instant::now() + duration;

    let _raw = match RawMode::enable() {
        Ok(guard) => guard,
        Err(err) => {
            log::warn!("keyboard control unavailable ({err}), playing without it");
            std::thread::sleep(duration);
            return Ok(());
        }
    };

    while Instant::now() < deadline {
        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match action_for(key.code, key.modifiers, params.len()) {
            Action::Pluck(voice) => {
                if let Err(err) = controller.pluck(voice, params[voice]) {
                    log::warn!("pluck {}: {err}", voice + 1);
                }
            }
            Action::Quit => break,
            Action::Ignore => {}
        }
    }

    Ok(())
}
