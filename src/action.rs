//! Game logic running on top of a map: dialogs, scripted moves, chests...

use crate::event::Event;
use crate::painter::Painter;
use std::fmt;

/// Something that reacts to input, runs over time and may draw itself.
///
/// Every method has a no-op default.
pub trait Action {
    /// Called when the action is added to a stack.
    fn start(&mut self) {}

    /// React to user input.
    fn handle(&mut self, event: &Event) {
        let _ = event;
    }

    /// Advance by `ticks` milliseconds, returns true once complete.
    fn update(&mut self, ticks: u32) -> bool {
        let _ = ticks;
        false
    }

    /// Draw over the map, after the above layer.
    fn draw(&self, painter: &mut dyn Painter) {
        let _ = painter;
    }

    /// Called exactly once, after completion or when the stack is cleared.
    fn end(&mut self) {}
}

/// Actions running side by side, in insertion order.
#[derive(Default)]
pub struct ActionStack {
    actions: Vec<Box<dyn Action>>,
}

impl ActionStack {
    /// Empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start `action` and keep it until it completes.
    pub fn add(&mut self, mut action: Box<dyn Action>) {
        action.start();
        self.actions.push(action);
    }

    /// Number of running actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// True when no action is left.
    pub fn completed(&self) -> bool {
        self.actions.is_empty()
    }

    /// Forward `event` to every action.
    pub fn handle(&mut self, event: &Event) {
        for action in &mut self.actions {
            action.handle(event);
        }
    }

    /// Update every action, ending and dropping the completed ones.
    /// Returns [`completed`](Self::completed).
    pub fn update(&mut self, ticks: u32) -> bool {
        self.actions.retain_mut(|action| {
            if action.update(ticks) {
                action.end();
                false
            } else {
                true
            }
        });

        self.completed()
    }

    /// Draw every action, oldest first.
    pub fn draw(&self, painter: &mut dyn Painter) {
        for action in &self.actions {
            action.draw(painter);
        }
    }

    /// End and drop every action. Safe to call twice.
    pub fn clear(&mut self) {
        for mut action in self.actions.drain(..) {
            action.end();
        }
    }
}

impl fmt::Debug for ActionStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionStack")
            .field("len", &self.actions.len())
            .finish()
    }
}
