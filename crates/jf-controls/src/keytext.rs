//! String building for keypad-driven input.

use std::sync::Mutex;

use crate::event::Event;

/// Builds a string one button press at a time.
pub struct KeypadStringBuilder {
    output: Mutex<String>,
    on_changed: Event<String>,
}

impl KeypadStringBuilder {
    pub fn new() -> Self {
        Self {
            output: Mutex::new(String::new()),
            on_changed: Event::new(),
        }
    }

    /// The current string.
    pub fn value(&self) -> String {
        self.output.lock().unwrap().clone()
    }

    /// Replace the current string. No event fires when the value is
    /// unchanged.
    pub fn set_string(&self, value: &str) {
        {
            let mut output = self.output.lock().unwrap();
            if *output == value {
                return;
            }
            *output = value.to_string();
        }
        self.on_changed.raise(&value.to_string());
    }

    /// Append one character.
    pub fn append_character(&self, character: char) {
        let mut next = self.value();
        next.push(character);
        self.set_string(&next);
    }

    /// Remove the last character, if any.
    pub fn backspace(&self) {
        let mut next = self.value();
        if next.pop().is_some() {
            self.set_string(&next);
        }
    }

    /// Clear the string.
    pub fn clear(&self) {
        self.set_string("");
    }

    /// Clear the builder and return its contents.
    pub fn pop(&self) -> String {
        let output = self.value();
        self.clear();
        output
    }

    /// Raised whenever the string changes.
    pub fn on_string_changed(&self, handler: impl Fn(&str) + Send + Sync + 'static) {
        self.on_changed.subscribe(move |value: &String| handler(value));
    }
}

impl Default for KeypadStringBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for KeypadStringBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex as StdMutex};

    #[test]
    fn characters_accumulate() {
        let builder = KeypadStringBuilder::new();
        builder.append_character('4');
        builder.append_character('2');
        assert_eq!(builder.value(), "42");
    }

    #[test]
    fn backspace_on_empty_is_a_no_op() {
        let builder = KeypadStringBuilder::new();
        builder.backspace();
        assert_eq!(builder.value(), "");
    }

    #[test]
    fn pop_returns_and_clears() {
        let builder = KeypadStringBuilder::new();
        builder.set_string("1234");
        assert_eq!(builder.pop(), "1234");
        assert_eq!(builder.value(), "");
    }

    #[test]
    fn change_events_fire_once_per_change() {
        let builder = KeypadStringBuilder::new();
        let seen = Arc::new(StdMutex::new(Vec::new()));
        let seen_in_handler = Arc::clone(&seen);
        builder.on_string_changed(move |value| {
            seen_in_handler.lock().unwrap().push(value.to_string());
        });

        builder.set_string("test");
        builder.set_string("test");
        assert_eq!(*seen.lock().unwrap(), vec!["test".to_string()]);
    }
}
