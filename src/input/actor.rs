//! Input Actor: dedicated thread polling crossterm for terminal events.
//!
//! Crossterm reports presses, releases and drags as separate kinds; the
//! actor folds them into the held-button state carried by [`MouseEvent`].

use super::events::{InputEvent, KeyCode, KeyEvent, KeyModifiers, MouseButtons, MouseEvent};
use crossbeam_channel::Sender;
use crossterm::event::{self, Event, KeyEventKind};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Configuration for the input actor.
#[derive(Debug, Clone)]
pub struct InputConfig {
    /// How long to wait for an event before re-checking shutdown.
    pub poll_timeout: Duration,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self { poll_timeout: Duration::from_millis(10) }
    }
}

/// Input actor that polls terminal events.
pub struct InputActor {
    /// Handle to the input thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
}

impl InputActor {
    /// Spawn the input actor thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS fails to spawn the thread.
    pub fn spawn(sender: Sender<InputEvent>, config: InputConfig) -> io::Result<Self> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let handle = thread::Builder::new()
            .name("weave-input".to_string())
            .spawn(move || Self::run_loop(&sender, &shutdown_clone, config.poll_timeout))?;

        Ok(Self { handle: Some(handle), shutdown })
    }

    /// Signal the input thread to shutdown.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Wait for the input thread to finish.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    fn run_loop(sender: &Sender<InputEvent>, shutdown: &AtomicBool, poll_timeout: Duration) {
        let mut converter = EventConverter::default();
        loop {
            if shutdown.load(Ordering::Relaxed) {
                let _ = sender.send(InputEvent::Shutdown);
                break;
            }

            let event = match event::poll(poll_timeout) {
                Ok(true) => event::read(),
                Ok(false) => continue,
                Err(e) => Err(e),
            };

            match event {
                Ok(event) => {
                    if let Some(input_event) = converter.convert(event) {
                        if sender.send(input_event).is_err() {
                            // Receiver dropped
                            break;
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "terminal event read failed");
                    let _ = sender.send(InputEvent::Error(e.to_string()));
                }
            }
        }
    }
}

impl Drop for InputActor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Stateful crossterm-to-[`InputEvent`] conversion.
///
/// Tracks which mouse buttons are held so every [`MouseEvent`] carries the
/// full button state.
#[derive(Debug, Default)]
pub struct EventConverter {
    held: MouseButtons,
}

impl EventConverter {
    /// Convert one crossterm event. Key releases/repeats and unsupported
    /// keys yield `None`.
    pub fn convert(&mut self, event: Event) -> Option<InputEvent> {
        match event {
            Event::Key(key_event) => {
                if key_event.kind != KeyEventKind::Press {
                    return None;
                }
                let code = convert_key_code(key_event.code)?;
                let modifiers = convert_modifiers(key_event.modifiers);
                Some(InputEvent::Key(KeyEvent { code, modifiers }))
            }
            Event::Mouse(mouse_event) => self.convert_mouse(mouse_event).map(InputEvent::Mouse),
            Event::Resize(width, height) => Some(InputEvent::Resize { width, height }),
            Event::FocusGained => Some(InputEvent::FocusGained),
            Event::FocusLost => Some(InputEvent::FocusLost),
            Event::Paste(text) => Some(InputEvent::Paste(text)),
        }
    }

    fn convert_mouse(&mut self, mouse: event::MouseEvent) -> Option<MouseEvent> {
        let mut buttons = self.held;
        match mouse.kind {
            event::MouseEventKind::Down(button) | event::MouseEventKind::Drag(button) => {
                self.held |= convert_mouse_button(button);
                buttons = self.held;
            }
            event::MouseEventKind::Up(button) => {
                self.held.remove(convert_mouse_button(button));
                buttons = self.held;
            }
            event::MouseEventKind::Moved => {}
            event::MouseEventKind::ScrollUp => buttons |= MouseButtons::WHEEL_UP,
            event::MouseEventKind::ScrollDown => buttons |= MouseButtons::WHEEL_DOWN,
            _ => return None,
        }
        Some(MouseEvent {
            x: mouse.column,
            y: mouse.row,
            buttons,
            modifiers: convert_modifiers(mouse.modifiers),
        })
    }
}

fn convert_key_code(code: event::KeyCode) -> Option<KeyCode> {
    Some(match code {
        event::KeyCode::Char(c) => KeyCode::Char(c),
        event::KeyCode::F(n) => KeyCode::F(n),
        event::KeyCode::Backspace => KeyCode::Backspace,
        event::KeyCode::Enter => KeyCode::Enter,
        event::KeyCode::Left => KeyCode::Left,
        event::KeyCode::Right => KeyCode::Right,
        event::KeyCode::Up => KeyCode::Up,
        event::KeyCode::Down => KeyCode::Down,
        event::KeyCode::Home => KeyCode::Home,
        event::KeyCode::End => KeyCode::End,
        event::KeyCode::PageUp => KeyCode::PageUp,
        event::KeyCode::PageDown => KeyCode::PageDown,
        event::KeyCode::Tab => KeyCode::Tab,
        event::KeyCode::BackTab => KeyCode::BackTab,
        event::KeyCode::Delete => KeyCode::Delete,
        event::KeyCode::Insert => KeyCode::Insert,
        event::KeyCode::Esc => KeyCode::Esc,
        _ => return None,
    })
}

fn convert_modifiers(mods: event::KeyModifiers) -> KeyModifiers {
    KeyModifiers {
        shift: mods.contains(event::KeyModifiers::SHIFT),
        control: mods.contains(event::KeyModifiers::CONTROL),
        alt: mods.contains(event::KeyModifiers::ALT),
        super_key: mods.contains(event::KeyModifiers::SUPER),
    }
}

const fn convert_mouse_button(button: event::MouseButton) -> MouseButtons {
    match button {
        event::MouseButton::Left => MouseButtons::LEFT,
        event::MouseButton::Right => MouseButtons::RIGHT,
        event::MouseButton::Middle => MouseButtons::MIDDLE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent as CtKeyEvent, MouseEvent as CtMouseEvent, MouseEventKind};

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(CtMouseEvent {
            kind,
            column,
            row,
            modifiers: event::KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_convert_key_press() {
        let mut converter = EventConverter::default();
        let event = Event::Key(CtKeyEvent::new(event::KeyCode::Char('a'), event::KeyModifiers::CONTROL));
        let expected = KeyEvent::with_modifiers(
            KeyCode::Char('a'),
            KeyModifiers { control: true, ..KeyModifiers::NONE },
        );
        assert_eq!(converter.convert(event), Some(InputEvent::Key(expected)));
    }

    #[test]
    fn test_mouse_press_drag_release_tracks_buttons() {
        let mut converter = EventConverter::default();
        let left = event::MouseButton::Left;

        let down = converter.convert(mouse(MouseEventKind::Down(left), 3, 4));
        assert_eq!(down, Some(InputEvent::Mouse(MouseEvent::new(3, 4, MouseButtons::LEFT))));

        let drag = converter.convert(mouse(MouseEventKind::Drag(left), 9, 4));
        assert_eq!(drag, Some(InputEvent::Mouse(MouseEvent::new(9, 4, MouseButtons::LEFT))));

        let up = converter.convert(mouse(MouseEventKind::Up(left), 9, 4));
        assert_eq!(up, Some(InputEvent::Mouse(MouseEvent::new(9, 4, MouseButtons::empty()))));
    }

    #[test]
    fn test_scroll_carries_wheel_flag_only_once() {
        let mut converter = EventConverter::default();
        let scroll = converter.convert(mouse(MouseEventKind::ScrollDown, 0, 0));
        assert_eq!(scroll, Some(InputEvent::Mouse(MouseEvent::new(0, 0, MouseButtons::WHEEL_DOWN))));

        let hover = converter.convert(mouse(MouseEventKind::Moved, 1, 0));
        assert_eq!(hover, Some(InputEvent::Mouse(MouseEvent::new(1, 0, MouseButtons::empty()))));
    }
}
