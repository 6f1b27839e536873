//! Round sessions
//!
//! Couples the game state with the prompt service: ticks while a round is
//! live, asks the play-again question once it ends, then resets or shuts
//! down.

use crate::platform::{InputSource, PromptService};
use crate::sim::{GameState, tick};

/// What a frame did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Round still going
    Running,
    /// Round ended and the player chose to play again
    Restarted,
    /// Round ended and the player quit
    Terminated,
}

pub struct Session<P: PromptService> {
    state: GameState,
    prompt: P,
    rounds_finished: u32,
    terminated: bool,
}

impl<P: PromptService> Session<P> {
    pub fn new(state: GameState, prompt: P) -> Self {
        Self {
            state,
            prompt,
            rounds_finished: 0,
            terminated: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn prompt(&self) -> &P {
        &self.prompt
    }

    pub fn rounds_finished(&self) -> u32 {
        self.rounds_finished
    }

    /// Run one frame
    pub fn frame(&mut self, input: &impl InputSource, dt: f32) -> SessionStatus {
        if self.terminated {
            return SessionStatus::Terminated;
        }

        tick(&mut self.state, input, dt);

        let Some(message) = self.state.round.prompt_message() else {
            return SessionStatus::Running;
        };
        self.rounds_finished += 1;

        if self.prompt.ask_yes_no(message) {
            self.state.reset();
            SessionStatus::Restarted
        } else {
            self.prompt.terminate();
            self.terminated = true;
            SessionStatus::Terminated
        }
    }
}
