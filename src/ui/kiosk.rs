//! Kiosk Screen
//!
//! Fullscreen terminal front end: raw mode plus alternate screen, a
//! dedicated thread feeding key events into a tokio channel, and a select
//! loop that drives the dispatcher and redraws the countdown at tick
//! cadence. Common exit shortcuts are swallowed so a child cannot leave by
//! accident; the parent combo Ctrl+Shift+Q quits.

use anyhow::Result;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{
        disable_raw_mode, enable_raw_mode, size, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use std::io::{self, Write};
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::business::{KeyDispatcher, KeyOutcome, RenderState};
use crate::data::AppConfig;

const BAR_WIDTH: usize = 40;

/// Run the kiosk screen until the parent exit combo is pressed.
pub async fn run_app(config: &AppConfig, dispatcher: KeyDispatcher) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, Hide)?;

    let result = event_loop(config, dispatcher, &mut stdout).await;

    // Always restore the terminal, even when the loop errored.
    let _ = execute!(stdout, LeaveAlternateScreen, Show);
    let _ = disable_raw_mode();
    result
}

/// What a raw terminal key event means to the kiosk.
#[derive(Debug, PartialEq, Eq)]
enum KioskInput {
    /// Forward to the dispatcher; it decides claim vs pass-through.
    Key(char),
    CycleLanguage,
    /// An exit shortcut the kiosk swallows (Esc, Ctrl+C, Ctrl+Q, Ctrl+W).
    Blocked(&'static str),
    Exit,
    Ignored,
}

fn map_key(key: &KeyEvent) -> KioskInput {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    if let KeyCode::Char(c) = key.code {
        if ctrl && shift && c.eq_ignore_ascii_case(&'q') {
            return KioskInput::Exit;
        }
        if ctrl {
            return match c.to_ascii_lowercase() {
                'c' => KioskInput::Blocked("Ctrl+C"),
                'q' => KioskInput::Blocked("Ctrl+Q"),
                'w' => KioskInput::Blocked("Ctrl+W"),
                _ => KioskInput::Ignored,
            };
        }
        return KioskInput::Key(c);
    }

    match key.code {
        KeyCode::F(2) => KioskInput::CycleLanguage,
        KeyCode::Esc => KioskInput::Blocked("Esc"),
        _ => KioskInput::Ignored,
    }
}

async fn event_loop(
    config: &AppConfig,
    mut dispatcher: KeyDispatcher,
    stdout: &mut io::Stdout,
) -> Result<()> {
    // Key intake on a dedicated thread; crossterm's read() blocks.
    let (tx, mut rx) = mpsc::channel::<Event>(32);
    std::thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.blocking_send(ev).is_err() {
                    break;
                }
            }
            Err(e) => {
                tracing::error!("Terminal event read failed: {}", e);
                break;
            }
        }
    });

    let hint = format!(
        "Press any letter key (A-Z) • Wait {} seconds between keys • F2 changes language",
        config.input.cooldown().as_secs().max(1)
    );

    let mut ticker = tokio::time::interval(config.input.tick());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    draw(stdout, &dispatcher.render_state(Instant::now()), &hint)?;

    loop {
        tokio::select! {
            maybe_event = rx.recv() => {
                let Some(ev) = maybe_event else {
                    tracing::warn!("Key event channel closed");
                    break;
                };
                match ev {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        match map_key(&key) {
                            KioskInput::Exit => {
                                tracing::info!("Parent exit combo pressed");
                                break;
                            }
                            KioskInput::CycleLanguage => {
                                dispatcher.cycle_language();
                                draw(stdout, &dispatcher.render_state(Instant::now()), &hint)?;
                            }
                            KioskInput::Blocked(combo) => {
                                tracing::debug!("{} blocked (kiosk mode)", combo);
                            }
                            KioskInput::Key(c) => {
                                let now = Instant::now();
                                if dispatcher.handle_key_press(c, now) == KeyOutcome::Claimed {
                                    draw(stdout, &dispatcher.render_state(now), &hint)?;
                                }
                            }
                            KioskInput::Ignored => {}
                        }
                    }
                    Event::Resize(..) => {
                        draw(stdout, &dispatcher.render_state(Instant::now()), &hint)?;
                    }
                    _ => {}
                }
            }
            _ = ticker.tick() => {
                let now = Instant::now();
                let was_active = dispatcher.render_state(now).cooldown_active;
                dispatcher.tick(now);
                if was_active {
                    draw(stdout, &dispatcher.render_state(now), &hint)?;
                }
            }
        }
    }

    Ok(())
}

fn draw(out: &mut io::Stdout, state: &RenderState<'_>, hint: &str) -> Result<()> {
    let (cols, rows) = size()?;
    queue!(out, Clear(ClearType::All))?;

    queue!(
        out,
        MoveTo(2, 1),
        SetAttribute(Attribute::Bold),
        SetForegroundColor(Color::Magenta),
        Print("TinyTyper"),
        SetAttribute(Attribute::Reset),
        ResetColor
    )?;

    let badge = format!("{} {}", state.language.flag(), state.language.display_name());
    let badge_col = cols.saturating_sub(badge.chars().count() as u16 + 3);
    queue!(out, MoveTo(badge_col, 1), Print(&badge))?;

    let mid = rows / 2;
    match state.displayed {
        Some(entry) => {
            let t = entry.translation(state.language);
            print_centered(
                out,
                cols,
                mid.saturating_sub(4),
                &entry.letter.to_string(),
                Some(Color::Magenta),
                true,
            )?;
            print_centered(out, cols, mid.saturating_sub(2), &t.emoji, None, false)?;
            print_centered(out, cols, mid, &t.display_word, None, true)?;
            if let Some(romanization) = &t.romanization {
                print_centered(out, cols, mid + 1, romanization, Some(Color::DarkGrey), false)?;
            }
        }
        None => {
            print_centered(out, cols, mid.saturating_sub(1), "⌨️  Press any letter!", None, true)?;
            print_centered(out, cols, mid + 1, "Type A-Z to learn", Some(Color::DarkGrey), false)?;
        }
    }

    if state.cooldown_active {
        let filled = ((state.progress / 100.0) * BAR_WIDTH as f64).round() as usize;
        let filled = filled.min(BAR_WIDTH);
        let bar = format!(
            "⏰ {}{}",
            "█".repeat(filled),
            "░".repeat(BAR_WIDTH - filled)
        );
        print_centered(out, cols, rows.saturating_sub(4), &bar, Some(Color::Yellow), false)?;
    }

    print_centered(out, cols, rows.saturating_sub(2), hint, Some(Color::DarkGrey), false)?;

    out.flush()?;
    Ok(())
}

fn print_centered(
    out: &mut io::Stdout,
    cols: u16,
    row: u16,
    text: &str,
    color: Option<Color>,
    bold: bool,
) -> Result<()> {
    let width = text.chars().count() as u16;
    let col = cols.saturating_sub(width) / 2;
    queue!(out, MoveTo(col, row))?;
    if let Some(color) = color {
        queue!(out, SetForegroundColor(color))?;
    }
    if bold {
        queue!(out, SetAttribute(Attribute::Bold))?;
    }
    queue!(out, Print(text), SetAttribute(Attribute::Reset), ResetColor)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn letters_and_punctuation_go_to_the_dispatcher() {
        assert_eq!(
            map_key(&key(KeyCode::Char('a'), KeyModifiers::NONE)),
            KioskInput::Key('a')
        );
        assert_eq!(
            map_key(&key(KeyCode::Char('B'), KeyModifiers::SHIFT)),
            KioskInput::Key('B')
        );
        // Non-letters are still forwarded; the dispatcher passes them through.
        assert_eq!(
            map_key(&key(KeyCode::Char('5'), KeyModifiers::NONE)),
            KioskInput::Key('5')
        );
    }

    #[test]
    fn exit_shortcuts_are_blocked_in_kiosk_mode() {
        assert_eq!(
            map_key(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            KioskInput::Blocked("Ctrl+C")
        );
        assert_eq!(
            map_key(&key(KeyCode::Char('q'), KeyModifiers::CONTROL)),
            KioskInput::Blocked("Ctrl+Q")
        );
        assert_eq!(
            map_key(&key(KeyCode::Esc, KeyModifiers::NONE)),
            KioskInput::Blocked("Esc")
        );
    }

    #[test]
    fn parent_combo_exits() {
        assert_eq!(
            map_key(&key(
                KeyCode::Char('Q'),
                KeyModifiers::CONTROL | KeyModifiers::SHIFT
            )),
            KioskInput::Exit
        );
    }

    #[test]
    fn function_keys_cycle_language_or_do_nothing() {
        assert_eq!(
            map_key(&key(KeyCode::F(2), KeyModifiers::NONE)),
            KioskInput::CycleLanguage
        );
        assert_eq!(
            map_key(&key(KeyCode::F(5), KeyModifiers::NONE)),
            KioskInput::Ignored
        );
    }
}
