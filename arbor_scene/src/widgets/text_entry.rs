// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-line editable text.

use crate::behavior::{Behavior, EventCx};
use crate::event::{Key, KeyEvent, TouchEvent, TouchPhase};

type TextCallback = Box<dyn FnMut(&str)>;

/// Editable text with a fixed prefix, for use as a node [`Behavior`].
///
/// Keys only reach the entry while it is focused. Pressing the node focuses it.
///
/// - Letters and pasted characters insert at the cursor.
/// - Left/Right move the cursor, Backspace/Delete edit around it. These act on
///   key press.
/// - Enter reports the text through [`TextEntry::on_text_entered`]; Back reports an
///   empty string. Both act on key release.
/// - Tab moves focus to the next sibling and reports the text through
///   [`TextEntry::on_focus_lost`].
/// - Up and Down are left to the container.
///
/// The prefix cannot be edited and the cursor never enters it. Rendering is left
/// to the host, which reads [`TextEntry::display_text`] and [`TextEntry::cursor`].
///
/// ```rust
/// use arbor_scene::widgets::TextEntry;
/// use arbor_scene::{Element, KeyEvent, Scene};
///
/// let mut scene: Scene = Scene::new();
/// let entry = scene
///     .insert(None, Element::leaf().focusable().with_behavior(TextEntry::new().with_prefix("> ")))
///     .unwrap();
/// scene.set_focused(entry, true);
/// scene.key(entry, &KeyEvent::character('h'));
/// scene.key(entry, &KeyEvent::character('i'));
/// assert_eq!(scene.behavior::<TextEntry>(entry).unwrap().text(), "> hi");
/// ```
#[derive(Default)]
pub struct TextEntry {
    text: String,
    prefix: String,
    mask: Option<char>,
    /// Cursor position in characters.
    cursor: usize,
    on_text_entered: Option<TextCallback>,
    on_text_changed: Option<TextCallback>,
    on_focus_lost: Option<TextCallback>,
}

impl core::fmt::Debug for TextEntry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TextEntry")
            .field("text", &self.text)
            .field("prefix", &self.prefix)
            .field("mask", &self.mask)
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}

impl TextEntry {
    /// Create an empty entry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the immutable prefix.
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.set_prefix(prefix);
        self
    }

    /// Display every character as `mask` (for passwords).
    pub fn with_mask(mut self, mask: char) -> Self {
        self.mask = Some(mask);
        self
    }

    /// Called with the text on Enter, or with an empty string on Back.
    pub fn on_text_entered(mut self, f: impl FnMut(&str) + 'static) -> Self {
        self.on_text_entered = Some(Box::new(f));
        self
    }

    /// Called with the new text after every edit.
    pub fn on_text_changed(mut self, f: impl FnMut(&str) + 'static) -> Self {
        self.on_text_changed = Some(Box::new(f));
        self
    }

    /// Called with the text when Tab moves focus away.
    pub fn on_focus_lost(mut self, f: impl FnMut(&str) + 'static) -> Self {
        self.on_focus_lost = Some(Box::new(f));
        self
    }

    /// Full text, prefix included.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text and move the cursor to its end.
    pub fn set_text(&mut self, text: &str) {
        if self.text == text {
            return;
        }
        self.text = text.to_owned();
        self.cursor = self.len();
    }

    /// The immutable prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Replace the prefix, keeping the text typed after it.
    pub fn set_prefix(&mut self, prefix: &str) {
        let old_len = self.prefix.chars().count();
        let new_len = prefix.chars().count();
        let typed = match self.text.strip_prefix(self.prefix.as_str()) {
            Some(rest) => {
                self.cursor = self.cursor.saturating_sub(old_len);
                rest.to_owned()
            }
            None => core::mem::take(&mut self.text),
        };
        self.text = format!("{prefix}{typed}");
        self.prefix = prefix.to_owned();
        self.cursor = (self.cursor + new_len).min(self.len());
    }

    /// Mask character, if any.
    pub fn mask(&self) -> Option<char> {
        self.mask
    }

    /// Text as it should be shown: masked if a mask is set.
    pub fn display_text(&self) -> String {
        match self.mask {
            Some(mask) => self.text.chars().map(|_| mask).collect(),
            None => self.text.clone(),
        }
    }

    /// Cursor position in characters, never inside the prefix.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }

    fn prefix_len(&self) -> usize {
        self.prefix.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map_or(self.text.len(), |(i, _)| i)
    }

    fn move_cursor(&mut self, by: isize) {
        let target = self.cursor.saturating_add_signed(by);
        self.cursor = target.clamp(self.prefix_len(), self.len());
    }

    fn changed(&mut self) {
        if let Some(f) = self.on_text_changed.as_mut() {
            f(&self.text);
        }
    }

    fn insert(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.text.insert(at, c);
        self.changed();
        self.move_cursor(1);
    }

    fn backspace(&mut self) {
        if self.cursor > self.prefix_len() {
            let at = self.byte_index(self.cursor - 1);
            self.text.remove(at);
            self.changed();
            self.move_cursor(-1);
        }
    }

    fn delete(&mut self) {
        if self.cursor < self.len() {
            let at = self.byte_index(self.cursor);
            self.text.remove(at);
            self.changed();
        }
    }

    fn entered(&mut self, text: &str) {
        if let Some(f) = self.on_text_entered.as_mut() {
            f(text);
        }
    }
}

impl<S: 'static> Behavior<S> for TextEntry {
    fn key(&mut self, cx: &mut EventCx<'_, S>, event: &KeyEvent) -> bool {
        if !cx.is_focused() {
            return false;
        }
        if event.is_release_of(Key::Back) {
            self.entered("");
            return true;
        }
        if event.is_release_of(Key::Enter) {
            let text = self.text.clone();
            self.entered(&text);
            return true;
        }
        if event.is_release_of(Key::Tab) {
            if cx.focus_next(true)
                && let Some(f) = self.on_focus_lost.as_mut()
            {
                f(&self.text);
            }
            return true;
        }
        if matches!(event.key, Key::Letter | Key::Paste)
            && let Some(c) = event.character.filter(|c| !c.is_control())
        {
            self.insert(c);
            return true;
        }
        if !event.up {
            match event.key {
                Key::Backspace => self.backspace(),
                Key::Delete => self.delete(),
                Key::Left => self.move_cursor(-1),
                Key::Right => self.move_cursor(1),
                _ => {}
            }
        }
        !matches!(event.key, Key::Up | Key::Down)
    }

    fn touch(&mut self, cx: &mut EventCx<'_, S>, event: &TouchEvent) -> bool {
        if event.phase == TouchPhase::Down && !cx.is_focused() {
            cx.set_focused(true);
            self.cursor = self.len();
        }
        true
    }

    fn focus_changed(&mut self, _cx: &mut EventCx<'_, S>, _focused: bool) {
        self.cursor = self.len();
    }

    fn removed(&mut self, cx: &mut EventCx<'_, S>) {
        cx.set_focused(false);
    }
}
