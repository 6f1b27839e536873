//! Fixed timestep simulation tick
//!
//! One tick per frame, in order:
//! 1. sample input and steer paddles
//! 2. integrate positions
//! 3. detect contacts, bounce, run brick dispatch
//! 4. camera expiry, life loss, win check
//! 5. sweep entities that fell off the board

use glam::Vec2;

use super::collision::{CollisionResult, bounce, box_collision, overlaps};
use super::dispatch::on_brick_hit;
use super::entity::{EntityId, EntityKind, Layer};
use super::round::LifeLoss;
use super::state::GameState;
use crate::consts::*;
use crate::platform::{InputSource, Key};

/// Input for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// End the round as a win (debug/testing)
    pub force_win: bool,
}

impl InputSource for TickInput {
    fn is_pressed(&self, key: Key) -> bool {
        match key {
            Key::Left => self.left,
            Key::Right => self.right,
            Key::ForceWin => self.force_win,
        }
    }
}

/// A bouncer overlapping something solid this tick
#[derive(Debug, Clone, Copy)]
struct Contact {
    mover: EntityId,
    obstacle: EntityId,
    kind: EntityKind,
    result: CollisionResult,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &impl InputSource, dt: f32) {
    // Ended rounds wait for the prompt
    if state.round.is_over() {
        return;
    }
    state.time_ticks += 1;

    steer_paddles(state, input);
    integrate(state, dt);
    resolve_contacts(state);
    collect_hearts(state);

    if input.is_pressed(Key::ForceWin) {
        state.round.force_win();
    }

    update_camera(state);

    // A round already ended this frame keeps its lives
    let ball_below = !state.round.is_over()
        && state
            .entities
            .get(state.ball)
            .is_some_and(|ball| ball.center.y > state.settings.window_height);
    if ball_below && state.lose_life() == LifeLoss::RoundLost {
        log::info!("Out of lives");
    }
    state.round.evaluate();

    sweep_out_of_bounds(state);
}

fn steer_paddles(state: &mut GameState, input: &impl InputSource) {
    let mut dir = 0.0;
    if input.is_pressed(Key::Left) {
        dir -= 1.0;
    }
    if input.is_pressed(Key::Right) {
        dir += 1.0;
    }
    for (_, entity) in state.entities.iter_mut() {
        if entity.kind.is_paddle() {
            entity.vel = Vec2::new(dir * PADDLE_SPEED, 0.0);
        }
    }
}

fn integrate(state: &mut GameState, dt: f32) {
    let min_x = WALL_THICKNESS;
    let max_x = state.settings.window_width - WALL_THICKNESS;
    for (_, entity) in state.entities.iter_mut() {
        if entity.vel == Vec2::ZERO {
            continue;
        }
        entity.center += entity.vel * dt;
        if entity.kind.is_paddle() {
            let half = entity.half_extents().x;
            entity.center.x = entity.center.x.clamp(min_x + half, (max_x - half).max(min_x + half));
        }
    }
}

fn resolve_contacts(state: &mut GameState) {
    let movers: Vec<EntityId> = state
        .entities
        .iter_layer(Layer::Default)
        .filter(|(_, e)| e.kind.is_bouncer())
        .map(|(id, _)| id)
        .collect();

    let mut contacts = Vec::new();
    for &mover_id in &movers {
        let Some(mover) = state.entities.get(mover_id) else {
            continue;
        };
        let obstacles = state
            .entities
            .iter_layer(Layer::Static)
            .chain(state.entities.iter_layer(Layer::Default))
            .filter(|(_, e)| e.kind.is_solid());
        for (obstacle_id, obstacle) in obstacles {
            let result = box_collision(mover, obstacle);
            if result.hit {
                contacts.push(Contact {
                    mover: mover_id,
                    obstacle: obstacle_id,
                    kind: obstacle.kind,
                    result,
                });
            }
        }
    }

    // Contacts were gathered against this tick's positions; a brick removed
    // by an earlier contact still bounces later movers but won't fire again.
    for contact in contacts {
        if let Some(mover) = state.entities.get_mut(contact.mover) {
            bounce(mover, &contact.result);
            mover.collisions += 1;
        }
        match contact.kind {
            EntityKind::Brick => {
                on_brick_hit(state, contact.obstacle, contact.mover);
            }
            EntityKind::ExtraPaddle => state.extra_paddle_hit(contact.obstacle),
            _ => {}
        }
    }
}

/// Hearts are caught by the main paddle only
fn collect_hearts(state: &mut GameState) {
    let Some(paddle) = state.entities.get(state.paddle) else {
        return;
    };
    let caught: Vec<EntityId> = state
        .entities
        .iter_layer(Layer::Default)
        .filter(|(_, e)| e.kind == EntityKind::Heart && overlaps(e, paddle))
        .map(|(id, _)| id)
        .collect();
    for heart in caught {
        state.collect_heart(heart);
    }
}

fn update_camera(state: &mut GameState) {
    let Some(target) = state.camera.target() else {
        return;
    };
    match state.entities.get(target) {
        Some(entity) => state.camera.update(entity.collisions),
        None => state.camera.detach(),
    }
}

/// Drop pucks and hearts that fell below the board. The main ball is handled
/// by the life check instead.
fn sweep_out_of_bounds(state: &mut GameState) {
    let floor = state.settings.window_height;
    let fallen: Vec<EntityId> = state
        .entities
        .iter_layer(Layer::Default)
        .filter(|(id, e)| *id != state.ball && e.center.y > floor)
        .map(|(id, _)| id)
        .collect();
    for id in fallen {
        state.entities.remove(id, Layer::Default);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::effect::{EffectKind, EffectRegistry, StrategyResolver};
    use crate::sim::round::GamePhase;

    fn state_with(settings: Settings, kind: EffectKind) -> GameState {
        GameState::with_resolver(settings, 4242, StrategyResolver::new(EffectRegistry::only(kind)))
            .unwrap()
    }

    /// Park the ball mid-board with no velocity so nothing happens by accident
    fn park_ball(state: &mut GameState) {
        let ball = state.entities.get_mut(state.ball).unwrap();
        ball.center = Vec2::new(350.0, 300.0);
        ball.vel = Vec2::ZERO;
    }

    #[test]
    fn test_clearing_full_board_wins() {
        let mut state = state_with(Settings::default(), EffectKind::NoOp);
        assert_eq!(state.round.active_bricks(), 56);
        park_ball(&mut state);

        let bricks: Vec<_> = state.bricks.keys().copied().collect();
        let ball = state.ball;
        let mut last = state.round.active_bricks();
        for brick in bricks {
            on_brick_hit(&mut state, brick, ball);
            let now = state.round.active_bricks();
            assert!(now < last);
            assert_eq!(now as usize, state.entities.count(EntityKind::Brick));
            last = now;
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert_eq!(state.round.phase(), GamePhase::WonPendingPrompt);
    }

    #[test]
    fn test_last_life_goes_straight_to_lost() {
        let mut state = state_with(Settings::default(), EffectKind::NoOp);
        state.lose_life();
        state.lose_life();
        assert_eq!(state.round.lives(), 1);

        let ball = state.entities.get_mut(state.ball).unwrap();
        ball.center = Vec2::new(350.0, WINDOW_HEIGHT + 5.0);
        ball.vel = Vec2::new(0.0, 200.0);
        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.round.lives(), 0);
        assert_eq!(state.round.phase(), GamePhase::LostPendingPrompt);
        assert!(state.life_icons.is_empty());
    }

    #[test]
    fn test_ball_loss_with_lives_left_respawns() {
        let mut state = state_with(Settings::default(), EffectKind::NoOp);
        let ball = state.entities.get_mut(state.ball).unwrap();
        ball.center = Vec2::new(350.0, WINDOW_HEIGHT + 5.0);
        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.round.lives(), DEFAULT_LIVES - 1);
        assert_eq!(state.round.phase(), GamePhase::Playing);
        let ball = state.entities.get(state.ball).unwrap();
        assert_eq!(ball.center, Vec2::new(350.0, 250.0));
        assert_eq!(ball.vel.abs(), Vec2::splat(BALL_INITIAL_SPEED));
    }

    #[test]
    fn test_ball_breaks_brick_on_contact() {
        let settings = Settings {
            rows: 1,
            columns: 1,
            ..Default::default()
        };
        let mut state = state_with(settings, EffectKind::SpawnExtraBalls);
        let brick = *state.bricks.keys().next().unwrap();
        let brick_center = state.entities.get(brick).unwrap().center;

        let ball = state.entities.get_mut(state.ball).unwrap();
        ball.center = brick_center + Vec2::new(0.0, 19.0);
        ball.vel = Vec2::new(0.0, -BALL_INITIAL_SPEED);
        tick(&mut state, &TickInput::default(), SIM_DT);

        assert!(!state.entities.contains(brick));
        assert_eq!(state.entities.count(EntityKind::Puck), 2);
        let ball = state.entities.get(state.ball).unwrap();
        assert!(ball.vel.y > 0.0, "ball bounced back down");
        assert_eq!(ball.collisions, 1);
        // Last brick gone: round won in the same tick
        assert_eq!(state.round.phase(), GamePhase::WonPendingPrompt);
    }

    #[test]
    fn test_extra_paddle_vanishes_after_four_hits() {
        let mut state = state_with(Settings::default(), EffectKind::NoOp);
        park_ball(&mut state);
        assert!(state.spawn_extra_paddle());
        let extra = state.extra_paddle.unwrap();
        let paddle_center = state.entities.get(extra).unwrap().center;

        for hit in 1..=EXTRA_PADDLE_HITS {
            state.spawn_pucks(Vec2::ZERO);
            let pucks = state.entities.ids_of(EntityKind::Puck);
            // Keep one puck falling onto the paddle, drop the rest
            for &id in &pucks[1..] {
                state.entities.remove(id, Layer::Default);
            }
            let puck = state.entities.get_mut(pucks[0]).unwrap();
            puck.center = paddle_center - Vec2::new(0.0, 14.0);
            puck.vel = Vec2::new(0.0, BALL_INITIAL_SPEED);
            tick(&mut state, &TickInput::default(), SIM_DT);
            state.entities.remove(pucks[0], Layer::Default);

            let expected = if hit < EXTRA_PADDLE_HITS { 2 } else { 1 };
            assert_eq!(state.round.active_paddles(), expected, "after hit {hit}");
        }
        assert!(!state.entities.contains(extra));
    }

    #[test]
    fn test_main_paddle_catches_heart() {
        let mut state = state_with(Settings::default(), EffectKind::NoOp);
        park_ball(&mut state);
        let paddle_center = state.entities.get(state.paddle).unwrap().center;
        state.spawn_heart(paddle_center - Vec2::new(0.0, 16.0));

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.round.lives(), DEFAULT_LIVES + 1);
        assert_eq!(state.entities.count(EntityKind::Heart), 0);
    }

    #[test]
    fn test_missed_heart_is_swept() {
        let mut state = state_with(Settings::default(), EffectKind::NoOp);
        park_ball(&mut state);
        state.spawn_heart(Vec2::new(30.0, WINDOW_HEIGHT - 0.5));

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.entities.count(EntityKind::Heart), 0);
        assert_eq!(state.round.lives(), DEFAULT_LIVES);
    }

    #[test]
    fn test_camera_released_after_five_bounces() {
        let mut state = state_with(Settings::default(), EffectKind::NoOp);
        park_ball(&mut state);
        let ball = state.ball;
        assert!(state.follow_camera(ball));
        assert_eq!(state.camera_view().map(|view| view.target), Some(ball));
        let start = state.ball_bounces();

        for extra in 1..=CAMERA_FOLLOW_BOUNCES {
            state.entities.get_mut(ball).unwrap().collisions = start + extra;
            tick(&mut state, &TickInput::default(), SIM_DT);
            let expect_active = extra < CAMERA_FOLLOW_BOUNCES;
            assert_eq!(state.camera.is_active(), expect_active, "bounce {extra}");
        }
        assert!(state.camera_view().is_none());
    }

    #[test]
    fn test_paddles_clamped_to_walls() {
        let mut state = state_with(Settings::default(), EffectKind::NoOp);
        park_ball(&mut state);
        let left = TickInput {
            left: true,
            ..Default::default()
        };
        for _ in 0..200 {
            tick(&mut state, &left, SIM_DT);
        }
        let paddle = state.entities.get(state.paddle).unwrap();
        assert!((paddle.top_left().x - WALL_THICKNESS).abs() < 1e-3);
    }

    #[test]
    fn test_force_win_is_debug_shortcut() {
        let mut state = state_with(Settings::default(), EffectKind::NoOp);
        park_ball(&mut state);
        let input = TickInput {
            force_win: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.round.phase(), GamePhase::WonPendingPrompt);

        // Finished rounds don't advance
        let ticks = state.time_ticks;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn test_force_win_freezes_lives_when_ball_falls_same_frame() {
        let mut state = state_with(Settings::default(), EffectKind::NoOp);
        let ball = state.entities.get_mut(state.ball).unwrap();
        ball.center = Vec2::new(350.0, WINDOW_HEIGHT + 5.0);
        ball.vel = Vec2::new(0.0, 200.0);
        let input = TickInput {
            force_win: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);

        assert_eq!(state.round.phase(), GamePhase::WonPendingPrompt);
        assert_eq!(state.round.lives(), DEFAULT_LIVES);
        assert_eq!(state.life_icons.len(), DEFAULT_LIVES as usize);
        assert_eq!(state.entities.count(EntityKind::LifeIcon), DEFAULT_LIVES as usize);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(Settings::default(), 99999).unwrap();
        let mut state2 = GameState::new(Settings::default(), 99999).unwrap();

        let inputs = [
            TickInput {
                left: true,
                ..Default::default()
            },
            TickInput::default(),
            TickInput {
                right: true,
                ..Default::default()
            },
        ];

        for i in 0..600 {
            let input = &inputs[i % inputs.len()];
            tick(&mut state1, input, SIM_DT);
            tick(&mut state2, input, SIM_DT);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.round, state2.round);
        let a: Vec<_> = state1.entities.iter().map(|(id, _, e)| (id, e.clone())).collect();
        let b: Vec<_> = state2.entities.iter().map(|(id, _, e)| (id, e.clone())).collect();
        assert_eq!(a, b);
    }
}
