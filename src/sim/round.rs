//! Round state machine
//!
//! Owns every counter that decides how a round ends: lives, live bricks,
//! live paddles. A round ends when the bricks run out (win) or the lives do
//! (loss); neither can be undone except by `reset`.

use serde::{Deserialize, Serialize};

use crate::consts::*;

const WIN_PROMPT: &str = "You win! Play again?";
const LOSE_PROMPT: &str = "You lose! Play again?";

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// All bricks gone, waiting for play-again answer
    WonPendingPrompt,
    /// Out of lives, waiting for play-again answer
    LostPendingPrompt,
}

/// Color band for the lives text display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LivesTone {
    /// Green
    Healthy,
    /// Yellow
    Danger,
    /// Red
    LastChance,
}

/// Result of the main ball leaving the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifeLoss {
    /// A life was spent, the ball goes back to the center
    Respawn,
    /// That was the last life
    RoundLost,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    lives: u8,
    active_bricks: u32,
    active_paddles: u8,
    phase: GamePhase,
}

impl RoundState {
    /// Fresh round: default lives, one paddle, `bricks` bricks on the board
    pub fn new(bricks: u32) -> Self {
        Self {
            lives: DEFAULT_LIVES,
            active_bricks: bricks,
            active_paddles: 1,
            phase: GamePhase::Playing,
        }
    }

    pub fn lives(&self) -> u8 {
        self.lives
    }

    pub fn active_bricks(&self) -> u32 {
        self.active_bricks
    }

    pub fn active_paddles(&self) -> u8 {
        self.active_paddles
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        self.phase != GamePhase::Playing
    }

    pub fn brick_destroyed(&mut self) {
        debug_assert!(self.active_bricks > 0, "brick destroyed with none active");
        self.active_bricks = self.active_bricks.saturating_sub(1);
    }

    /// Register a new extra paddle. False (and nothing changes) at the cap.
    pub fn try_add_paddle(&mut self) -> bool {
        if self.active_paddles >= MAX_PADDLES {
            return false;
        }
        self.active_paddles += 1;
        true
    }

    pub fn paddle_destroyed(&mut self) {
        debug_assert!(self.active_paddles > 1, "main paddle is never destroyed");
        self.active_paddles = self.active_paddles.saturating_sub(1).max(1);
    }

    /// Add a life. False (and nothing changes) at `MAX_LIVES`.
    pub fn gain_life(&mut self) -> bool {
        if self.lives >= MAX_LIVES {
            return false;
        }
        self.lives += 1;
        true
    }

    /// The main ball fell below the board
    pub fn ball_lost(&mut self) -> LifeLoss {
        debug_assert!(self.lives > 0, "ball lost with no lives left");
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.end(GamePhase::LostPendingPrompt);
            LifeLoss::RoundLost
        } else {
            LifeLoss::Respawn
        }
    }

    /// Per-frame win check
    pub fn evaluate(&mut self) -> GamePhase {
        if self.active_bricks == 0 {
            self.end(GamePhase::WonPendingPrompt);
        }
        self.phase
    }

    /// Debug-only: end the round as a win regardless of bricks left
    pub fn force_win(&mut self) {
        log::warn!("Debug force-win with {} bricks left", self.active_bricks);
        self.end(GamePhase::WonPendingPrompt);
    }

    /// Only a playing round can end; an ended round stays ended
    fn end(&mut self, phase: GamePhase) {
        if self.phase == GamePhase::Playing {
            log::info!(
                "Round over: {phase:?} (lives {}, bricks {})",
                self.lives,
                self.active_bricks
            );
            self.phase = phase;
        }
    }

    /// Start over with default lives and a single paddle
    pub fn reset(&mut self, bricks: u32) {
        *self = Self::new(bricks);
    }

    pub fn lives_tone(&self) -> LivesTone {
        match self.lives {
            2 => LivesTone::Danger,
            0 | 1 => LivesTone::LastChance,
            _ => LivesTone::Healthy,
        }
    }

    /// Play-again question for a finished round
    pub fn prompt_message(&self) -> Option<&'static str> {
        match self.phase {
            GamePhase::Playing => None,
            GamePhase::WonPendingPrompt => Some(WIN_PROMPT),
            GamePhase::LostPendingPrompt => Some(LOSE_PROMPT),
        }
    }
}
