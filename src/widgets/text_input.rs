//! Text Input Widget: single-line text entry with a cursor.
//!
//! Reports its own damage, advertises key hints, and can veto focus
//! auto-advance while a validator rejects its content.

use crate::buffer::{Rgb, Style};
use crate::damage::Invalidator;
use crate::input::{KeyCode, KeyEvent, MouseEvent};
use crate::layout::Rect;
use crate::painter::Painter;
use crate::widget::{
    CycleBlocker, FocusState, InvalidationAware, KeyHint, KeyHintsProvider, MouseAware, Widget, WidgetId,
};

/// Configuration for the text input widget.
#[derive(Debug, Clone)]
pub struct TextInputConfig {
    /// Style for text and the empty part of the line.
    pub style: Style,
    /// Style of the cell under the cursor while focused.
    pub cursor_style: Style,
    /// Placeholder text shown when empty.
    pub placeholder: String,
    /// Placeholder style.
    pub placeholder_style: Style,
    /// Prompt prefix (e.g. `"> "`).
    pub prompt: String,
    /// Prompt style.
    pub prompt_style: Style,
}

impl Default for TextInputConfig {
    fn default() -> Self {
        let style = Style::new(Rgb::WHITE, Rgb::new(30, 30, 30));
        Self {
            style,
            cursor_style: style.inverted(),
            placeholder: String::new(),
            placeholder_style: style.fg(Rgb::new(100, 100, 100)),
            prompt: String::new(),
            prompt_style: style.fg(Rgb::new(0, 255, 255)),
        }
    }
}

type Validator = Box<dyn Fn(&str) -> bool + Send>;

/// A single-line text input.
pub struct TextInput {
    id: WidgetId,
    /// Current text content.
    content: String,
    /// Cursor position as a byte offset on a char boundary.
    cursor: usize,
    bounds: Rect,
    focused: bool,
    config: TextInputConfig,
    validator: Option<Validator>,
    submitted: Option<String>,
    invalidator: Option<Invalidator>,
}

impl TextInput {
    /// Create a new text input with the given bounds.
    pub fn new(bounds: Rect) -> Self {
        Self::with_config(bounds, TextInputConfig::default())
    }

    /// Create a new text input with custom configuration.
    pub fn with_config(bounds: Rect, config: TextInputConfig) -> Self {
        Self {
            id: WidgetId::next(),
            content: String::new(),
            cursor: 0,
            bounds,
            focused: false,
            config,
            validator: None,
            submitted: None,
            invalidator: None,
        }
    }

    /// Only let focus advance on Enter while `validator` accepts the content.
    #[must_use]
    pub fn with_validator(mut self, validator: impl Fn(&str) -> bool + Send + 'static) -> Self {
        self.validator = Some(Box::new(validator));
        self
    }

    /// Get the current text content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Set the content, moving the cursor to the end.
    pub fn set_content(&mut self, content: &str) {
        self.content = content.to_string();
        self.cursor = self.content.len();
        self.invalidate();
    }

    /// Clear the content.
    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
        self.invalidate();
    }

    /// Check if the input is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Whether the validator, if any, accepts the content.
    pub fn is_valid(&self) -> bool {
        self.validator.as_ref().map_or(true, |valid| valid(&self.content))
    }

    /// Take the text last submitted with Enter.
    pub fn take_submitted(&mut self) -> Option<String> {
        self.submitted.take()
    }

    fn invalidate(&self) {
        if let Some(invalidator) = &self.invalidator {
            invalidator.invalidate(self.bounds);
        }
    }

    fn insert_char(&mut self, c: char) {
        self.content.insert(self.cursor, c);
        self.cursor += c.len_utf8();
        self.invalidate();
    }

    fn prev_boundary(&self) -> usize {
        self.content[..self.cursor].char_indices().last().map_or(0, |(i, _)| i)
    }

    fn backspace(&mut self) {
        if self.cursor > 0 {
            let prev = self.prev_boundary();
            self.content.remove(prev);
            self.cursor = prev;
            self.invalidate();
        }
    }

    fn delete(&mut self) {
        if self.cursor < self.content.len() {
            self.content.remove(self.cursor);
            self.invalidate();
        }
    }

    fn cursor_left(&mut self) {
        if self.cursor > 0 {
            self.cursor = self.prev_boundary();
            self.invalidate();
        }
    }

    fn cursor_right(&mut self) {
        if let Some(c) = self.content[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
            self.invalidate();
        }
    }

    fn move_cursor_to(&mut self, cursor: usize) {
        if self.cursor != cursor {
            self.cursor = cursor;
            self.invalidate();
        }
    }

    fn prompt_width(&self) -> usize {
        self.config.prompt.chars().count()
    }

    /// Columns available for content after the prompt.
    fn text_width(&self) -> usize {
        usize::try_from(self.bounds.width).unwrap_or(0).saturating_sub(self.prompt_width())
    }

    /// Chars scrolled off the left edge so the cursor stays visible.
    fn scroll_offset(&self, cursor_chars: usize) -> usize {
        let width = self.text_width();
        if width > 0 && cursor_chars >= width {
            cursor_chars - width + 1
        } else {
            0
        }
    }
}

impl Widget for TextInput {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.invalidate();
        self.bounds = bounds;
        self.invalidate();
    }

    fn draw(&self, painter: &mut Painter<'_>) {
        let Rect { x, y, .. } = self.bounds;
        painter.fill(self.bounds, ' ', self.config.style);
        let text_x = x + painter.draw_text(x, y, &self.config.prompt, self.config.prompt_style);
        let text_width = self.text_width();

        if self.content.is_empty() && !self.focused {
            let placeholder: String = self.config.placeholder.chars().take(text_width).collect();
            painter.draw_text(text_x, y, &placeholder, self.config.placeholder_style);
            return;
        }

        let cursor_chars = self.content[..self.cursor].chars().count();
        let offset = self.scroll_offset(cursor_chars);
        let mut col = text_x;
        for (i, c) in self.content.chars().skip(offset).take(text_width).enumerate() {
            let style = if self.focused && i + offset == cursor_chars {
                self.config.cursor_style
            } else {
                self.config.style
            };
            col += painter.draw_text(col, y, c.encode_utf8(&mut [0; 4]), style);
        }
        if self.focused && cursor_chars == self.content.chars().count() && cursor_chars - offset < text_width {
            painter.set_cell(col, y, ' ', self.config.cursor_style);
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> bool {
        if !self.focused {
            return false;
        }
        match key.code {
            KeyCode::Char(c) if !key.modifiers.control && !key.modifiers.alt => self.insert_char(c),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.cursor_left(),
            KeyCode::Right => self.cursor_right(),
            KeyCode::Home => self.move_cursor_to(0),
            KeyCode::End => self.move_cursor_to(self.content.len()),
            KeyCode::Esc if !self.content.is_empty() => self.clear(),
            KeyCode::Enter => {
                if self.is_valid() {
                    self.submitted = Some(self.content.clone());
                }
            }
            _ => return false,
        }
        true
    }

    fn focusable(&self) -> bool {
        true
    }

    fn focus(&mut self) {
        self.focused = true;
        self.invalidate();
    }

    fn blur(&mut self) {
        self.focused = false;
        self.invalidate();
    }

    fn as_mouse_aware_mut(&mut self) -> Option<&mut dyn MouseAware> {
        Some(self)
    }

    fn as_invalidation_aware_mut(&mut self) -> Option<&mut dyn InvalidationAware> {
        Some(self)
    }

    fn as_focus_state(&self) -> Option<&dyn FocusState> {
        Some(self)
    }

    fn as_key_hints(&self) -> Option<&dyn KeyHintsProvider> {
        Some(self)
    }

    fn as_cycle_blocker(&self) -> Option<&dyn CycleBlocker> {
        Some(self)
    }
}

impl MouseAware for TextInput {
    /// A press on the text row moves the cursor under the pointer.
    fn handle_mouse(&mut self, event: &MouseEvent) -> bool {
        let (x, y) = event.position();
        if !event.buttons.any_pressed() || y != self.bounds.y || !self.bounds.contains(x, y) {
            return false;
        }
        let column = usize::try_from(x - self.bounds.x).unwrap_or(0);
        let cursor_chars = self.content[..self.cursor].chars().count();
        let target = column.saturating_sub(self.prompt_width()) + self.scroll_offset(cursor_chars);
        let cursor = self.content.char_indices().nth(target).map_or(self.content.len(), |(i, _)| i);
        self.move_cursor_to(cursor);
        true
    }
}

impl InvalidationAware for TextInput {
    fn set_invalidator(&mut self, invalidator: Invalidator) {
        self.invalidator = Some(invalidator);
    }
}

impl FocusState for TextInput {
    fn is_focused(&self) -> bool {
        self.focused
    }
}

impl KeyHintsProvider for TextInput {
    fn key_hints(&self) -> Vec<KeyHint> {
        vec![KeyHint::new("Enter", "submit"), KeyHint::new("Esc", "clear")]
    }
}

impl CycleBlocker for TextInput {
    fn blocks_cycling(&self) -> bool {
        !self.is_valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Buffer;
    use crate::input::MouseButtons;

    fn focused_input(width: i32) -> TextInput {
        let mut input = TextInput::new(Rect::new(0, 0, width, 1));
        input.focus();
        input
    }

    fn type_str(input: &mut TextInput, text: &str) {
        for c in text.chars() {
            input.handle_key(&KeyEvent::new(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_text_input_basic() {
        let mut input = focused_input(80);
        type_str(&mut input, "Hi");
        assert_eq!(input.content(), "Hi");
        assert_eq!(input.cursor, 2);
    }

    #[test]
    fn test_ignores_keys_when_blurred() {
        let mut input = TextInput::new(Rect::new(0, 0, 10, 1));
        assert!(!input.handle_key(&KeyEvent::new(KeyCode::Char('a'))));
        assert!(input.is_empty());
    }

    #[test]
    fn test_text_input_backspace_multibyte() {
        let mut input = focused_input(80);
        input.set_content("héé");
        input.handle_key(&KeyEvent::new(KeyCode::Backspace));
        assert_eq!(input.content(), "hé");
        input.handle_key(&KeyEvent::new(KeyCode::Left));
        input.handle_key(&KeyEvent::new(KeyCode::Delete));
        assert_eq!(input.content(), "h");
    }

    #[test]
    fn test_text_input_cursor_movement() {
        let mut input = focused_input(80);
        input.set_content("Hello");
        input.handle_key(&KeyEvent::new(KeyCode::Left));
        assert_eq!(input.cursor, 4);
        input.handle_key(&KeyEvent::new(KeyCode::Home));
        assert_eq!(input.cursor, 0);
        input.handle_key(&KeyEvent::new(KeyCode::End));
        assert_eq!(input.cursor, 5);
    }

    #[test]
    fn test_draw_scrolls_to_cursor() {
        let mut input = focused_input(4);
        input.set_content("abcdef");
        let mut buffer = Buffer::new(4, 1);
        input.draw(&mut Painter::new(&mut buffer));
        assert_eq!(buffer.row_text(0), "def ");
        assert_eq!(buffer.get(3, 0).map(|c| c.style()), Some(input.config.cursor_style));
    }

    #[test]
    fn test_placeholder_when_blurred_and_empty() {
        let config = TextInputConfig { placeholder: "name".to_string(), ..TextInputConfig::default() };
        let input = TextInput::with_config(Rect::new(0, 0, 6, 1), config);
        let mut buffer = Buffer::new(6, 1);
        input.draw(&mut Painter::new(&mut buffer));
        assert_eq!(buffer.row_text(0), "name  ");
    }

    #[test]
    fn test_validator_blocks_cycling() {
        let mut input = focused_input(10).with_validator(|s| s.parse::<u32>().is_ok());
        type_str(&mut input, "x");
        assert!(input.blocks_cycling());
        assert!(input.handle_key(&KeyEvent::new(KeyCode::Enter)));
        assert_eq!(input.take_submitted(), None);

        input.set_content("42");
        assert!(!input.blocks_cycling());
        input.handle_key(&KeyEvent::new(KeyCode::Enter));
        assert_eq!(input.take_submitted().as_deref(), Some("42"));
    }

    #[test]
    fn test_click_moves_cursor() {
        let mut input = focused_input(10);
        input.set_content("hello");
        assert!(input.handle_mouse(&MouseEvent::new(2, 0, MouseButtons::LEFT)));
        assert_eq!(input.cursor, 2);
        assert!(input.handle_mouse(&MouseEvent::new(9, 0, MouseButtons::LEFT)));
        assert_eq!(input.cursor, 5);
    }

    #[test]
    fn test_mutations_report_damage() {
        use crate::damage::DamageTracker;
        use std::sync::Arc;

        let tracker = Arc::new(DamageTracker::new());
        let mut input = focused_input(10);
        input.set_invalidator(Invalidator::new(tracker.clone()));
        type_str(&mut input, "ab");
        assert_eq!(tracker.take(), vec![Rect::new(0, 0, 10, 1); 2]);
    }
}
