//! Platform abstraction layer
//!
//! The core talks to the outside world through two narrow traits:
//! - `InputSource`: key state for paddle movement and the debug win key
//! - `PromptService`: the end-of-round play-again question
//!
//! `headless` provides implementations that need no window.

pub mod headless;

pub use headless::{Autopilot, ScriptedPrompt};

/// Keys the core reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    /// Debug-only: end the round as a win
    ForceWin,
}

pub trait InputSource {
    fn is_pressed(&self, key: Key) -> bool;
}

pub trait PromptService {
    /// Ask a yes/no question; true means yes
    fn ask_yes_no(&mut self, message: &str) -> bool;
    /// Shut the game down
    fn terminate(&mut self);
}
