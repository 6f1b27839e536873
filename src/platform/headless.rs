//! Window-less collaborators
//!
//! `Autopilot` plays the main paddle on its own, `ScriptedPrompt` answers
//! play-again questions from a fixed budget. Together they let the binary
//! run whole rounds without a renderer.

use crate::sim::{EntityKind, GameState, Layer, TickInput};

/// Paddle AI: chase the lowest bouncer that is heading down
#[derive(Debug, Clone)]
pub struct Autopilot {
    /// Horizontal slack before the paddle bothers to move
    pub dead_zone: f32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self { dead_zone: 8.0 }
    }
}

impl Autopilot {
    pub fn sample(&self, state: &GameState) -> TickInput {
        let Some(paddle) = state.entities.get(state.paddle) else {
            return TickInput::default();
        };

        // Prefer whatever is falling closest to the paddle
        let target = state
            .entities
            .iter_layer(Layer::Default)
            .filter(|(_, e)| e.kind.is_bouncer() && e.vel.y > 0.0)
            .max_by(|(_, a), (_, b)| a.center.y.total_cmp(&b.center.y))
            .map(|(_, e)| e.center.x);

        // Hearts are worth a detour when nothing is falling, else shadow the ball
        let target = target
            .or_else(|| {
                state
                    .entities
                    .iter_layer(Layer::Default)
                    .find(|(_, e)| e.kind == EntityKind::Heart)
                    .map(|(_, e)| e.center.x)
            })
            .or_else(|| state.entities.get(state.ball).map(|b| b.center.x));

        let Some(target_x) = target else {
            return TickInput::default();
        };
        let offset = target_x - paddle.center.x;
        TickInput {
            left: offset < -self.dead_zone,
            right: offset > self.dead_zone,
            force_win: false,
        }
    }
}

/// Answers yes to the first `replays` questions, then no
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompt {
    replays_left: u32,
    /// Every question asked, in order
    pub asked: Vec<String>,
    pub terminated: bool,
}

impl ScriptedPrompt {
    pub fn new(replays: u32) -> Self {
        Self {
            replays_left: replays,
            ..Default::default()
        }
    }
}

impl super::PromptService for ScriptedPrompt {
    fn ask_yes_no(&mut self, message: &str) -> bool {
        self.asked.push(message.to_string());
        let yes = self.replays_left > 0;
        self.replays_left = self.replays_left.saturating_sub(1);
        log::info!("{message} {}", if yes { "yes" } else { "no" });
        yes
    }

    fn terminate(&mut self) {
        log::info!("Closing game");
        self.terminated = true;
    }
}
