//! Compositor Demo: a small form driven by the input and redraw actors.
//!
//! Demonstrates:
//! - A bordered panel of text inputs with Tab / Shift-Tab cycling
//! - Enter advancing to the next field (blocked while the email is invalid)
//! - Mouse clicks moving focus
//! - A status bar showing the focused widget's key hints
//! - F1 opening a modal overlay; clicking outside dismisses it
//!
//! Press Ctrl-C (or Esc with nothing to clear) to exit.

use crossbeam_channel::unbounded;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute};
use std::io;
use std::sync::Arc;
use weave::input::{InputActor, InputConfig};
use weave::widgets::{Panel, PanelLayout, StatusBar, TextInput, TextInputConfig};
use weave::{
    BorderCharset, Compositor, CompositorConfig, DriverConfig, InputEvent, KeyCode, Rect, RedrawDriver, Rgb, Style,
    WidgetId,
};

/// Puts the terminal into raw mode on creation and restores it on drop.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture, cursor::Hide)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        let _ = execute!(stdout, cursor::Show, DisableMouseCapture, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

fn field(prompt: &str, placeholder: &str) -> TextInput {
    TextInput::with_config(
        Rect::ZERO,
        TextInputConfig {
            prompt: prompt.to_string(),
            placeholder: placeholder.to_string(),
            ..TextInputConfig::default()
        },
    )
}

fn build_form(compositor: &Compositor) -> WidgetId {
    let mut form = Panel::new(Rect::ZERO)
        .bordered(true)
        .border(BorderCharset::ROUNDED, Style::DEFAULT.fg(Rgb::new(120, 160, 220)))
        .layout(PanelLayout::Rows, true);
    form.push(field("Name   > ", "your name"));
    form.push(field("Email  > ", "someone@example.com").with_validator(|text| text.is_empty() || text.contains('@')));
    form.push(field("Notes  > ", "anything else"));
    compositor.set_root(form)
}

fn open_help(compositor: &Compositor) -> WidgetId {
    let (width, height) = compositor.size();
    let (width, height) = (i32::from(width), i32::from(height));
    let bounds = Rect::new(width / 4, height / 3, width / 2, 3);
    let mut help = Panel::new(bounds)
        .bordered(true)
        .border(BorderCharset::DOUBLE, Style::DEFAULT.fg(Rgb::new(220, 180, 80)))
        .layout(PanelLayout::Rows, false)
        .modal(true)
        .z_index(10);
    help.push(field("Search > ", "click outside to close"));
    let id = compositor.add(help);
    compositor.focus(id);
    id
}

fn main() -> io::Result<()> {
    let (width, height) = terminal::size()?;
    let _guard = TerminalGuard::enter()?;

    let compositor = Arc::new(Compositor::new(width, height, CompositorConfig::default()));
    let form = build_form(&compositor);

    let mut status = StatusBar::new();
    status.set_left(" weave demo");
    status.set_right("F1 help  Ctrl-C quit ");
    let status: Box<dyn weave::Widget> = Box::new(status);
    let status_id = status.id();
    compositor.set_status_bar(Some(status));
    compositor.add_focus_observer(status_id);
    compositor.focus(form);

    let (input_tx, input_rx) = unbounded();
    let input = InputActor::spawn(input_tx, InputConfig::default())?;
    let driver = RedrawDriver::spawn(compositor.clone(), io::stdout(), DriverConfig::default())?;

    let mut help: Option<WidgetId> = None;
    for event in &input_rx {
        if let InputEvent::Key(key) = &event {
            if key.modifiers.control && key.code == KeyCode::Char('c') {
                break;
            }
            if key.code == KeyCode::F(1) && help.is_none() {
                help = Some(open_help(&compositor));
                continue;
            }
        }
        if matches!(event, InputEvent::Shutdown) {
            break;
        }

        let handled = compositor.handle_event(&event);

        // A dismissed overlay stays in the tree until removed.
        if let Some(id) = help {
            let active = compositor
                .with_widget(id, |widget| widget.as_modal().is_some_and(|modal| modal.is_modal()))
                .unwrap_or(false);
            if !active {
                compositor.remove(id);
                compositor.focus(form);
                help = None;
            }
        }

        if let InputEvent::Key(key) = &event {
            if key.code == KeyCode::Esc && !handled {
                match help.take() {
                    Some(id) => {
                        compositor.remove(id);
                        compositor.focus(form);
                    }
                    None => break,
                }
            }
        }
    }

    driver.join();
    input.join();
    Ok(())
}
