//! Keypads and directional pads.

use std::sync::{Arc, Mutex};

use jf_core::{Join, SigKind};
use jf_panel::{PanelDevice, SigEndpoint, SmartObject, SubscriptionId};

use crate::base::{Control, ControlBase};
use crate::error::ControlResult;
use crate::event::Event;
use crate::offsets::{ControlParent, Indexed};

const KEYPAD_SIG_RANGE_START: u16 = 1;
const KEYPAD_SIG_RANGE_END: u16 = 12;
const KEYPAD_ZERO_SIG: u16 = 10;

// Custom character defaults from the panel design tool.
const DEFAULT_MISC_ONE_CHAR: char = '*';
const DEFAULT_MISC_TWO_CHAR: char = '#';

/// One key of a twelve-key keypad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeypadButton {
    Zero,
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    MiscOne,
    MiscTwo,
}

impl KeypadButton {
    fn from_sig(number: u16) -> Option<Self> {
        // The zero key arrives on sig 10.
        match number {
            1 => Some(Self::One),
            2 => Some(Self::Two),
            3 => Some(Self::Three),
            4 => Some(Self::Four),
            5 => Some(Self::Five),
            6 => Some(Self::Six),
            7 => Some(Self::Seven),
            8 => Some(Self::Eight),
            9 => Some(Self::Nine),
            KEYPAD_ZERO_SIG => Some(Self::Zero),
            11 => Some(Self::MiscOne),
            12 => Some(Self::MiscTwo),
            _ => None,
        }
    }

    fn digit(self) -> Option<char> {
        match self {
            Self::Zero => Some('0'),
            Self::One => Some('1'),
            Self::Two => Some('2'),
            Self::Three => Some('3'),
            Self::Four => Some('4'),
            Self::Five => Some('5'),
            Self::Six => Some('6'),
            Self::Seven => Some('7'),
            Self::Eight => Some('8'),
            Self::Nine => Some('9'),
            Self::MiscOne | Self::MiscTwo => None,
        }
    }
}

/// A twelve-key keypad smart object: digits plus two configurable misc keys.
pub struct Keypad {
    inner: Arc<KeypadInner>,
}

struct KeypadInner {
    base: ControlBase,
    smart: Arc<dyn SmartObject>,
    misc_one_char: Mutex<char>,
    misc_two_char: Mutex<char>,
    on_button_pressed: Event<KeypadButton>,
    on_button_released: Event<KeypadButton>,
    subscriptions: Mutex<Vec<(Join, SubscriptionId)>>,
}

impl Keypad {
    pub fn new(panel: Arc<dyn PanelDevice>, smart_object_id: u32) -> ControlResult<Self> {
        Self::build(panel, smart_object_id, None)
    }

    pub fn with_parent(
        panel: Arc<dyn PanelDevice>,
        smart_object_id: u32,
        parent: Arc<dyn ControlParent>,
    ) -> ControlResult<Self> {
        Self::build(panel, smart_object_id, Some(parent))
    }

    fn build(
        panel: Arc<dyn PanelDevice>,
        smart_object_id: u32,
        parent: Option<Arc<dyn ControlParent>>,
    ) -> ControlResult<Self> {
        let smart = panel.smart_object(smart_object_id)?;
        let inner = Arc::new(KeypadInner {
            base: ControlBase::new(panel, parent, 0),
            smart,
            misc_one_char: Mutex::new(DEFAULT_MISC_ONE_CHAR),
            misc_two_char: Mutex::new(DEFAULT_MISC_TWO_CHAR),
            on_button_pressed: Event::new(),
            on_button_released: Event::new(),
            subscriptions: Mutex::new(Vec::new()),
        });

        let mut subscriptions = Vec::new();
        for number in KEYPAD_SIG_RANGE_START..=KEYPAD_SIG_RANGE_END {
            let join = Join::new(number);
            let weak = Arc::downgrade(&inner);
            let id = inner.smart.register_output_sig(
                join,
                SigKind::Digital,
                Arc::new(move |event| {
                    let Some(inner) = weak.upgrade() else {
                        return;
                    };
                    let Some(button) = KeypadButton::from_sig(event.join.get()) else {
                        return;
                    };
                    match event.value.as_digital() {
                        Some(true) => inner.press(button),
                        Some(false) => inner.release(button),
                        None => {}
                    }
                }),
            );
            subscriptions.push((join, id));
        }
        *inner.subscriptions.lock().unwrap() = subscriptions;

        Ok(Self { inner })
    }

    /// The custom character of the bottom-left key.
    pub fn misc_button_one_char(&self) -> char {
        *self.inner.misc_one_char.lock().unwrap()
    }

    pub fn set_misc_button_one_char(&self, character: char) {
        *self.inner.misc_one_char.lock().unwrap() = character;
    }

    /// The custom character of the bottom-right key.
    pub fn misc_button_two_char(&self) -> char {
        *self.inner.misc_two_char.lock().unwrap()
    }

    pub fn set_misc_button_two_char(&self, character: char) {
        *self.inner.misc_two_char.lock().unwrap() = character;
    }

    /// The character a key produces, honoring the configured misc chars.
    pub fn char_for_button(&self, button: KeypadButton) -> char {
        match button {
            KeypadButton::MiscOne => self.misc_button_one_char(),
            KeypadButton::MiscTwo => self.misc_button_two_char(),
            digit => digit.digit().unwrap_or_default(),
        }
    }

    /// Simulate a press on the given key.
    pub fn press(&self, button: KeypadButton) {
        self.inner.press(button);
    }

    /// Simulate a release on the given key.
    pub fn release(&self, button: KeypadButton) {
        self.inner.release(button);
    }

    /// Raised when the user presses a key.
    pub fn on_button_pressed(&self, handler: impl Fn(KeypadButton) + Send + Sync + 'static) {
        self.inner
            .on_button_pressed
            .subscribe(move |button| handler(*button));
    }

    /// Raised when the user releases a key.
    pub fn on_button_released(&self, handler: impl Fn(KeypadButton) + Send + Sync + 'static) {
        self.inner
            .on_button_released
            .subscribe(move |button| handler(*button));
    }
}

impl KeypadInner {
    fn press(&self, button: KeypadButton) {
        if self.base.is_visible_recursive() {
            self.on_button_pressed.raise(&button);
        }
    }

    fn release(&self, button: KeypadButton) {
        if self.base.is_visible_recursive() {
            self.on_button_released.raise(&button);
        }
    }
}

impl Indexed for Keypad {
    fn index(&self) -> u16 {
        self.inner.base.index()
    }
}

impl Control for Keypad {
    fn base(&self) -> &ControlBase {
        &self.inner.base
    }
}

impl Drop for Keypad {
    fn drop(&mut self) {
        for (join, id) in self.inner.subscriptions.lock().unwrap().drain(..) {
            self.inner
                .smart
                .unregister_output_sig(join, SigKind::Digital, id);
        }
        self.inner.on_button_pressed.clear();
        self.inner.on_button_released.clear();
    }
}

/// Simple pairing of a lowercase and uppercase character for on-screen
/// keyboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardKey {
    lower: char,
    upper: char,
}

impl KeyboardKey {
    pub fn new(lower: char) -> Self {
        Self {
            lower,
            upper: lower.to_ascii_uppercase(),
        }
    }

    pub fn with_upper(lower: char, upper: char) -> Self {
        Self { lower, upper }
    }

    /// The character produced under the given shift/caps state.
    ///
    /// Caps lock only affects letters; shift affects everything.
    pub fn char_for(&self, shift: bool, caps: bool) -> char {
        let upper = if self.lower.is_alphabetic() {
            shift ^ caps
        } else {
            shift
        };
        if upper { self.upper } else { self.lower }
    }
}

// D-pad smart-object joins.
const DPAD_UP_JOIN: u16 = 1;
const DPAD_DOWN_JOIN: u16 = 2;
const DPAD_LEFT_JOIN: u16 = 3;
const DPAD_RIGHT_JOIN: u16 = 4;
const DPAD_CENTER_JOIN: u16 = 5;

/// One direction of a five-way pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DpadDirection {
    Up,
    Down,
    Left,
    Right,
    Center,
}

impl DpadDirection {
    fn from_sig(number: u16) -> Option<Self> {
        match number {
            DPAD_UP_JOIN => Some(Self::Up),
            DPAD_DOWN_JOIN => Some(Self::Down),
            DPAD_LEFT_JOIN => Some(Self::Left),
            DPAD_RIGHT_JOIN => Some(Self::Right),
            DPAD_CENTER_JOIN => Some(Self::Center),
            _ => None,
        }
    }
}

/// A five-way directional pad smart object.
pub struct Dpad {
    inner: Arc<DpadInner>,
}

struct DpadInner {
    base: ControlBase,
    smart: Arc<dyn SmartObject>,
    on_button_pressed: Event<DpadDirection>,
    on_button_released: Event<DpadDirection>,
    subscriptions: Mutex<Vec<(Join, SubscriptionId)>>,
}

impl Dpad {
    pub fn new(panel: Arc<dyn PanelDevice>, smart_object_id: u32) -> ControlResult<Self> {
        Self::build(panel, smart_object_id, None)
    }

    pub fn with_parent(
        panel: Arc<dyn PanelDevice>,
        smart_object_id: u32,
        parent: Arc<dyn ControlParent>,
    ) -> ControlResult<Self> {
        Self::build(panel, smart_object_id, Some(parent))
    }

    fn build(
        panel: Arc<dyn PanelDevice>,
        smart_object_id: u32,
        parent: Option<Arc<dyn ControlParent>>,
    ) -> ControlResult<Self> {
        let smart = panel.smart_object(smart_object_id)?;
        let inner = Arc::new(DpadInner {
            base: ControlBase::new(panel, parent, 0),
            smart,
            on_button_pressed: Event::new(),
            on_button_released: Event::new(),
            subscriptions: Mutex::new(Vec::new()),
        });

        let mut subscriptions = Vec::new();
        for number in DPAD_UP_JOIN..=DPAD_CENTER_JOIN {
            let join = Join::new(number);
            let weak = Arc::downgrade(&inner);
            let id = inner.smart.register_output_sig(
                join,
                SigKind::Digital,
                Arc::new(move |event| {
                    let Some(inner) = weak.upgrade() else {
                        return;
                    };
                    let Some(direction) = DpadDirection::from_sig(event.join.get()) else {
                        return;
                    };
                    match event.value.as_digital() {
                        Some(true) => inner.press(direction),
                        Some(false) => inner.release(direction),
                        None => {}
                    }
                }),
            );
            subscriptions.push((join, id));
        }
        *inner.subscriptions.lock().unwrap() = subscriptions;

        Ok(Self { inner })
    }

    /// Simulate a press on the given direction.
    pub fn press(&self, direction: DpadDirection) {
        self.inner.press(direction);
    }

    /// Simulate a release on the given direction.
    pub fn release(&self, direction: DpadDirection) {
        self.inner.release(direction);
    }

    /// Raised when the user presses a directional button.
    pub fn on_button_pressed(&self, handler: impl Fn(DpadDirection) + Send + Sync + 'static) {
        self.inner
            .on_button_pressed
            .subscribe(move |direction| handler(*direction));
    }

    /// Raised when the user releases a directional button.
    pub fn on_button_released(&self, handler: impl Fn(DpadDirection) + Send + Sync + 'static) {
        self.inner
            .on_button_released
            .subscribe(move |direction| handler(*direction));
    }
}

impl DpadInner {
    fn press(&self, direction: DpadDirection) {
        if self.base.is_visible_recursive() {
            self.on_button_pressed.raise(&direction);
        }
    }

    fn release(&self, direction: DpadDirection) {
        if self.base.is_visible_recursive() {
            self.on_button_released.raise(&direction);
        }
    }
}

impl Indexed for Dpad {
    fn index(&self) -> u16 {
        self.inner.base.index()
    }
}

impl Control for Dpad {
    fn base(&self) -> &ControlBase {
        &self.inner.base
    }
}

impl Drop for Dpad {
    fn drop(&mut self) {
        for (join, id) in self.inner.subscriptions.lock().unwrap().drain(..) {
            self.inner
                .smart
                .unregister_output_sig(join, SigKind::Digital, id);
        }
        self.inner.on_button_pressed.clear();
        self.inner.on_button_released.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyboard_key_shift_and_caps_cancel_for_letters() {
        let key = KeyboardKey::new('a');
        assert_eq!(key.char_for(false, false), 'a');
        assert_eq!(key.char_for(true, false), 'A');
        assert_eq!(key.char_for(false, true), 'A');
        assert_eq!(key.char_for(true, true), 'a');
    }

    #[test]
    fn keyboard_key_caps_does_not_affect_symbols() {
        let key = KeyboardKey::with_upper('1', '!');
        assert_eq!(key.char_for(false, true), '1');
        assert_eq!(key.char_for(true, true), '!');
    }

    #[test]
    fn zero_key_arrives_on_sig_ten() {
        assert_eq!(KeypadButton::from_sig(10), Some(KeypadButton::Zero));
        assert_eq!(KeypadButton::from_sig(1), Some(KeypadButton::One));
        assert_eq!(KeypadButton::from_sig(13), None);
    }
}
