use macroquad::input::{get_keys_pressed, get_keys_released, is_quit_requested, KeyCode};

/// Keys the map reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Arrow up.
    Up,
    /// Arrow right.
    Right,
    /// Arrow down.
    Down,
    /// Arrow left.
    Left,
    /// Toggles the debug overlays.
    Tab,
    /// Any key the map ignores.
    Other,
}

impl From<KeyCode> for Key {
    fn from(code: KeyCode) -> Self {
        match code {
            KeyCode::Up => Key::Up,
            KeyCode::Right => Key::Right,
            KeyCode::Down => Key::Down,
            KeyCode::Left => Key::Left,
            KeyCode::Tab => Key::Tab,
            _ => Key::Other,
        }
    }
}

/// Input delivered to [`Map::handle`](crate::Map::handle).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Key pressed this frame.
    KeyDown(Key),
    /// Key released this frame.
    KeyUp(Key),
    /// The window was asked to close.
    Quit,
}

/// Key transitions of the current frame. Requires a macroquad context.
pub fn poll_events() -> Vec<Event> {
    let mut events: Vec<Event> = get_keys_pressed()
        .into_iter()
        .map(|k| Event::KeyDown(k.into()))
        .collect();

    events.extend(get_keys_released().into_iter().map(|k| Event::KeyUp(k.into())));

    if is_quit_requested() {
        events.push(Event::Quit);
    }

    events
}
