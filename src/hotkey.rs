use eframe::egui;
use std::fmt;
use std::sync::{Arc, Mutex};
#[cfg(target_os = "windows")]
use std::thread;
#[cfg(target_os = "windows")]
use std::time::Duration;

/// Platform independent key identifier.
///
/// Letters are stored upper case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Letter(char),
    Digit(u8),
    F(u8),
    Space,
    Tab,
    Enter,
    Escape,
    Delete,
    Backspace,
    Home,
    End,
    PageUp,
    PageDown,
    Left,
    Right,
    Up,
    Down,
    OpenBracket,
    CloseBracket,
    Minus,
    Equals,
    Comma,
    Period,
    Semicolon,
    Slash,
    Backslash,
    Plus,
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Letter(c) => write!(f, "{c}"),
            Key::Digit(d) => write!(f, "{d}"),
            Key::F(n) => write!(f, "F{n}"),
            Key::Space => f.write_str("Space"),
            Key::Tab => f.write_str("Tab"),
            Key::Enter => f.write_str("Enter"),
            Key::Escape => f.write_str("Esc"),
            Key::Delete => f.write_str("Delete"),
            Key::Backspace => f.write_str("Backspace"),
            Key::Home => f.write_str("Home"),
            Key::End => f.write_str("End"),
            Key::PageUp => f.write_str("PageUp"),
            Key::PageDown => f.write_str("PageDown"),
            Key::Left => f.write_str("Left"),
            Key::Right => f.write_str("Right"),
            Key::Up => f.write_str("Up"),
            Key::Down => f.write_str("Down"),
            Key::OpenBracket => f.write_str("["),
            Key::CloseBracket => f.write_str("]"),
            Key::Minus => f.write_str("-"),
            Key::Equals => f.write_str("="),
            Key::Comma => f.write_str(","),
            Key::Period => f.write_str("."),
            Key::Semicolon => f.write_str(";"),
            Key::Slash => f.write_str("/"),
            Key::Backslash => f.write_str("\\"),
            Key::Plus => f.write_str("Plus"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hotkey {
    pub key: Key,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Default for Hotkey {
    fn default() -> Self {
        Self {
            key: Key::CloseBracket,
            ctrl: false,
            shift: false,
            alt: false,
        }
    }
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            f.write_str("Ctrl+")?;
        }
        if self.alt {
            f.write_str("Alt+")?;
        }
        if self.shift {
            f.write_str("Shift+")?;
        }
        write!(f, "{}", self.key)
    }
}

/// Parse a hotkey string like "Ctrl+Shift+Space" into a [`Hotkey`].
pub fn parse_hotkey(s: &str) -> Option<Hotkey> {
    let mut ctrl = false;
    let mut shift = false;
    let mut alt = false;
    let mut key: Option<Key> = None;

    for part in s.split('+') {
        let upper = part.trim().to_ascii_uppercase();
        match upper.as_str() {
            "CTRL" | "CONTROL" => ctrl = true,
            "SHIFT" => shift = true,
            "ALT" => alt = true,
            "" => {}
            _ => {
                // a second key is not a combination we can watch for
                if key.is_some() {
                    return None;
                }
                key = Some(parse_key(&upper)?);
            }
        }
    }

    key.map(|k| Hotkey {
        key: k,
        ctrl,
        shift,
        alt,
    })
}

fn parse_key(upper: &str) -> Option<Key> {
    match upper {
        "SPACE" => Some(Key::Space),
        "TAB" => Some(Key::Tab),
        "ENTER" | "RETURN" => Some(Key::Enter),
        "ESC" | "ESCAPE" => Some(Key::Escape),
        "DELETE" | "DEL" => Some(Key::Delete),
        "BACKSPACE" => Some(Key::Backspace),
        "HOME" => Some(Key::Home),
        "END" => Some(Key::End),
        "PAGEUP" => Some(Key::PageUp),
        "PAGEDOWN" => Some(Key::PageDown),
        "LEFT" | "LEFTARROW" => Some(Key::Left),
        "RIGHT" | "RIGHTARROW" => Some(Key::Right),
        "UP" | "UPARROW" => Some(Key::Up),
        "DOWN" | "DOWNARROW" => Some(Key::Down),
        "[" | "BRACKETLEFT" => Some(Key::OpenBracket),
        "]" | "BRACKETRIGHT" => Some(Key::CloseBracket),
        "-" | "MINUS" => Some(Key::Minus),
        "=" | "EQUALS" | "EQUAL" => Some(Key::Equals),
        "," | "COMMA" => Some(Key::Comma),
        "." | "PERIOD" => Some(Key::Period),
        ";" | "SEMICOLON" => Some(Key::Semicolon),
        "/" | "SLASH" => Some(Key::Slash),
        "\\" | "BACKSLASH" => Some(Key::Backslash),
        "PLUS" => Some(Key::Plus),
        _ if upper.len() > 1 && upper.starts_with('F') => match upper[1..].parse::<u8>() {
            Ok(n @ 1..=12) => Some(Key::F(n)),
            _ => None,
        },
        _ => {
            let mut chars = upper.chars();
            let c = chars.next()?;
            if chars.next().is_some() {
                return None;
            }
            if let Some(d) = c.to_digit(10) {
                Some(Key::Digit(d as u8))
            } else if c.is_ascii_alphabetic() {
                Some(Key::Letter(c))
            } else {
                None
            }
        }
    }
}

const EGUI_LETTERS: [egui::Key; 26] = [
    egui::Key::A,
    egui::Key::B,
    egui::Key::C,
    egui::Key::D,
    egui::Key::E,
    egui::Key::F,
    egui::Key::G,
    egui::Key::H,
    egui::Key::I,
    egui::Key::J,
    egui::Key::K,
    egui::Key::L,
    egui::Key::M,
    egui::Key::N,
    egui::Key::O,
    egui::Key::P,
    egui::Key::Q,
    egui::Key::R,
    egui::Key::S,
    egui::Key::T,
    egui::Key::U,
    egui::Key::V,
    egui::Key::W,
    egui::Key::X,
    egui::Key::Y,
    egui::Key::Z,
];

const EGUI_DIGITS: [egui::Key; 10] = [
    egui::Key::Num0,
    egui::Key::Num1,
    egui::Key::Num2,
    egui::Key::Num3,
    egui::Key::Num4,
    egui::Key::Num5,
    egui::Key::Num6,
    egui::Key::Num7,
    egui::Key::Num8,
    egui::Key::Num9,
];

const EGUI_FUNCTION: [egui::Key; 12] = [
    egui::Key::F1,
    egui::Key::F2,
    egui::Key::F3,
    egui::Key::F4,
    egui::Key::F5,
    egui::Key::F6,
    egui::Key::F7,
    egui::Key::F8,
    egui::Key::F9,
    egui::Key::F10,
    egui::Key::F11,
    egui::Key::F12,
];

impl Hotkey {
    /// Key used for the in-window shortcut.
    pub fn to_egui(&self) -> Option<egui::Key> {
        Some(match self.key {
            Key::Letter(c) => *EGUI_LETTERS.get((c as u8).checked_sub(b'A')? as usize)?,
            Key::Digit(d) => *EGUI_DIGITS.get(d as usize)?,
            Key::F(n) => *EGUI_FUNCTION.get((n as usize).checked_sub(1)?)?,
            Key::Space => egui::Key::Space,
            Key::Tab => egui::Key::Tab,
            Key::Enter => egui::Key::Enter,
            Key::Escape => egui::Key::Escape,
            Key::Delete => egui::Key::Delete,
            Key::Backspace => egui::Key::Backspace,
            Key::Home => egui::Key::Home,
            Key::End => egui::Key::End,
            Key::PageUp => egui::Key::PageUp,
            Key::PageDown => egui::Key::PageDown,
            Key::Left => egui::Key::ArrowLeft,
            Key::Right => egui::Key::ArrowRight,
            Key::Up => egui::Key::ArrowUp,
            Key::Down => egui::Key::ArrowDown,
            Key::OpenBracket => egui::Key::OpenBracket,
            Key::CloseBracket => egui::Key::CloseBracket,
            Key::Minus => egui::Key::Minus,
            Key::Equals => egui::Key::Equals,
            Key::Comma => egui::Key::Comma,
            Key::Period => egui::Key::Period,
            Key::Semicolon => egui::Key::Semicolon,
            Key::Slash => egui::Key::Slash,
            Key::Backslash => egui::Key::Backslash,
            Key::Plus => egui::Key::Plus,
        })
    }

    /// Whether the modifier state of an egui key event matches exactly.
    pub fn matches_modifiers(&self, modifiers: &egui::Modifiers) -> bool {
        self.modifiers_match(modifiers.ctrl, modifiers.shift, modifiers.alt)
    }

    /// Exact modifier comparison shared by the in-window and global
    /// bindings. Shift is not compared for `Plus`, which most layouts only
    /// produce with shift held.
    pub fn modifiers_match(&self, ctrl: bool, shift: bool, alt: bool) -> bool {
        ctrl == self.ctrl
            && alt == self.alt
            && (self.key == Key::Plus || shift == self.shift)
    }
}

/// A key as seen by the global listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Ctrl,
    Shift,
    Alt,
    Key(Key),
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Press(KeyInput),
    Release(KeyInput),
}

/// Tracks pressed keys and reports the watched combination once per press.
#[derive(Debug, Clone)]
pub struct ComboTracker {
    hotkey: Hotkey,
    ctrl_pressed: bool,
    shift_pressed: bool,
    alt_pressed: bool,
    watch_pressed: bool,
    triggered: bool,
}

impl ComboTracker {
    pub fn new(hotkey: Hotkey) -> Self {
        Self {
            hotkey,
            ctrl_pressed: false,
            shift_pressed: false,
            alt_pressed: false,
            watch_pressed: false,
            triggered: false,
        }
    }

    pub fn hotkey(&self) -> Hotkey {
        self.hotkey
    }

    /// Feed one key event. Returns `true` when the combination fires.
    pub fn handle(&mut self, event: KeyEvent) -> bool {
        let (input, down) = match event {
            KeyEvent::Press(i) => (i, true),
            KeyEvent::Release(i) => (i, false),
        };
        match input {
            KeyInput::Ctrl => self.ctrl_pressed = down,
            KeyInput::Shift => self.shift_pressed = down,
            KeyInput::Alt => self.alt_pressed = down,
            KeyInput::Key(k) if k == self.hotkey.key => self.watch_pressed = down,
            // shifted `=` is how the main keyboard types `+`
            KeyInput::Key(Key::Equals)
                if self.hotkey.key == Key::Plus && (self.shift_pressed || !down) =>
            {
                self.watch_pressed = down
            }
            KeyInput::Key(_) | KeyInput::Other => {}
        }

        let combo = self.watch_pressed
            && self
                .hotkey
                .modifiers_match(self.ctrl_pressed, self.shift_pressed, self.alt_pressed);
        if combo {
            if !self.triggered {
                self.triggered = true;
                tracing::debug!(hotkey = %self.hotkey, "hotkey match");
                return true;
            }
        } else {
            if self.triggered {
                tracing::debug!("combo released");
            }
            self.triggered = false;
        }
        false
    }
}

/// Per-listener matching state. Follows the shared binding so a re-register
/// takes effect on the next key event.
struct MatchState {
    binding: Arc<Mutex<Option<Hotkey>>>,
    tracker: Option<ComboTracker>,
}

impl MatchState {
    fn new(binding: Arc<Mutex<Option<Hotkey>>>) -> Self {
        Self {
            binding,
            tracker: None,
        }
    }

    fn handle(&mut self, event: KeyEvent) -> bool {
        let current = match self.binding.lock() {
            Ok(guard) => *guard,
            Err(_) => None,
        };
        match current {
            None => {
                self.tracker = None;
                false
            }
            Some(hotkey) => {
                if self.tracker.as_ref().map(|t| t.hotkey()) != Some(hotkey) {
                    self.tracker = Some(ComboTracker::new(hotkey));
                }
                self.tracker
                    .as_mut()
                    .map(|t| t.handle(event))
                    .unwrap_or(false)
            }
        }
    }
}

/// System wide hotkey listener.
///
/// The OS hook runs on its own thread for the lifetime of the process and
/// calls the `on_fire` callback from that thread. Only one binding is
/// active at a time.
pub struct HotkeyListener {
    binding: Arc<Mutex<Option<Hotkey>>>,
    started: bool,
}

impl Default for HotkeyListener {
    fn default() -> Self {
        Self::new()
    }
}

impl HotkeyListener {
    pub fn new() -> Self {
        Self {
            binding: Arc::new(Mutex::new(None)),
            started: false,
        }
    }

    /// Whether this platform has a global keyboard hook.
    pub fn is_available() -> bool {
        cfg!(target_os = "windows")
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn current(&self) -> Option<Hotkey> {
        self.binding.lock().ok().and_then(|g| *g)
    }

    /// Replace the active binding. The previous one stops firing first.
    pub fn register(&self, hotkey: Hotkey) {
        if let Ok(mut guard) = self.binding.lock() {
            if let Some(prev) = guard.take() {
                tracing::info!("unregistered global hotkey '{}'", prev);
            }
            *guard = Some(hotkey);
            tracing::info!("registered global hotkey '{}'", hotkey);
        }
    }

    pub fn unregister(&self) {
        if let Ok(mut guard) = self.binding.lock() {
            if let Some(prev) = guard.take() {
                tracing::info!("unregistered global hotkey '{}'", prev);
            }
        }
    }

    /// Spawn the OS listener thread. Returns `false` when global hotkeys are
    /// not supported here; the caller keeps working without them.
    pub fn start<F>(&mut self, on_fire: F) -> bool
    where
        F: Fn() + Send + Sync + 'static,
    {
        if self.started {
            return true;
        }
        if !Self::is_available() {
            tracing::warn!("global hotkeys are not available on this platform");
            return false;
        }
        #[cfg(target_os = "windows")]
        {
            spawn_listener(self.binding.clone(), Arc::new(on_fire));
            self.started = true;
        }
        #[cfg(not(target_os = "windows"))]
        drop(on_fire);
        self.started
    }

    /// Run events through the same matching path the OS thread uses and
    /// return how many times the binding fired.
    pub fn process_test_events(&self, events: &[KeyEvent]) -> usize {
        let mut state = MatchState::new(self.binding.clone());
        events.iter().filter(|e| state.handle(**e)).count()
    }
}

#[cfg(target_os = "windows")]
fn spawn_listener(binding: Arc<Mutex<Option<Hotkey>>>, on_fire: Arc<dyn Fn() + Send + Sync>) {
    tracing::debug!("starting global hotkey listener");
    thread::spawn(move || loop {
        let mut state = MatchState::new(binding.clone());
        let fire = on_fire.clone();
        let result = rdev::listen(move |event| {
            let key_event = match event.event_type {
                rdev::EventType::KeyPress(k) => KeyEvent::Press(input_from_rdev(k)),
                rdev::EventType::KeyRelease(k) => KeyEvent::Release(input_from_rdev(k)),
                _ => return,
            };
            if state.handle(key_event) {
                fire();
            }
        });

        match result {
            Ok(()) => tracing::warn!("hotkey listener exited unexpectedly. Restarting shortly"),
            Err(e) => tracing::warn!("hotkey listener failed: {:?}. Retrying shortly", e),
        }

        thread::sleep(Duration::from_millis(500));
    });
}

#[cfg(target_os = "windows")]
fn input_from_rdev(key: rdev::Key) -> KeyInput {
    use rdev::Key as R;
    let k = match key {
        R::ControlLeft | R::ControlRight => return KeyInput::Ctrl,
        R::ShiftLeft | R::ShiftRight => return KeyInput::Shift,
        R::Alt | R::AltGr => return KeyInput::Alt,
        R::KeyA => Key::Letter('A'),
        R::KeyB => Key::Letter('B'),
        R::KeyC => Key::Letter('C'),
        R::KeyD => Key::Letter('D'),
        R::KeyE => Key::Letter('E'),
        R::KeyF => Key::Letter('F'),
        R::KeyG => Key::Letter('G'),
        R::KeyH => Key::Letter('H'),
        R::KeyI => Key::Letter('I'),
        R::KeyJ => Key::Letter('J'),
        R::KeyK => Key::Letter('K'),
        R::KeyL => Key::Letter('L'),
        R::KeyM => Key::Letter('M'),
        R::KeyN => Key::Letter('N'),
        R::KeyO => Key::Letter('O'),
        R::KeyP => Key::Letter('P'),
        R::KeyQ => Key::Letter('Q'),
        R::KeyR => Key::Letter('R'),
        R::KeyS => Key::Letter('S'),
        R::KeyT => Key::Letter('T'),
        R::KeyU => Key::Letter('U'),
        R::KeyV => Key::Letter('V'),
        R::KeyW => Key::Letter('W'),
        R::KeyX => Key::Letter('X'),
        R::KeyY => Key::Letter('Y'),
        R::KeyZ => Key::Letter('Z'),
        R::Num0 => Key::Digit(0),
        R::Num1 => Key::Digit(1),
        R::Num2 => Key::Digit(2),
        R::Num3 => Key::Digit(3),
        R::Num4 => Key::Digit(4),
        R::Num5 => Key::Digit(5),
        R::Num6 => Key::Digit(6),
        R::Num7 => Key::Digit(7),
        R::Num8 => Key::Digit(8),
        R::Num9 => Key::Digit(9),
        R::F1 => Key::F(1),
        R::F2 => Key::F(2),
        R::F3 => Key::F(3),
        R::F4 => Key::F(4),
        R::F5 => Key::F(5),
        R::F6 => Key::F(6),
        R::F7 => Key::F(7),
        R::F8 => Key::F(8),
        R::F9 => Key::F(9),
        R::F10 => Key::F(10),
        R::F11 => Key::F(11),
        R::F12 => Key::F(12),
        R::Space => Key::Space,
        R::Tab => Key::Tab,
        R::Return => Key::Enter,
        R::Escape => Key::Escape,
        R::Delete => Key::Delete,
        R::Backspace => Key::Backspace,
        R::Home => Key::Home,
        R::End => Key::End,
        R::PageUp => Key::PageUp,
        R::PageDown => Key::PageDown,
        R::LeftArrow => Key::Left,
        R::RightArrow => Key::Right,
        R::UpArrow => Key::Up,
        R::DownArrow => Key::Down,
        R::LeftBracket => Key::OpenBracket,
        R::RightBracket => Key::CloseBracket,
        R::Minus => Key::Minus,
        R::Equal => Key::Equals,
        R::Comma => Key::Comma,
        R::Dot => Key::Period,
        R::SemiColon => Key::Semicolon,
        R::Slash => Key::Slash,
        R::BackSlash => Key::Backslash,
        R::KpPlus => Key::Plus,
        _ => return KeyInput::Other,
    };
    KeyInput::Key(k)
}
