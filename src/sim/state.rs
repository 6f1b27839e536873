//! Game state owner
//!
//! `GameState` is the only owner of mutable game data: the entity registry,
//! the brick records, the round counters, the camera and the RNG. Effects
//! and the tick mutate it through `&mut`, never through shared state.

use std::collections::BTreeMap;
use std::f32::consts::PI;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::brick::Brick;
use super::camera::{CameraFollowController, CameraView};
use super::effect::StrategyResolver;
use super::entity::{EntityFactory, EntityId, EntityKind, EntityRegistry, Layer, StandardFactory};
use super::round::{LifeLoss, LivesTone, RoundState};
use crate::consts::*;
use crate::error::ConfigError;
use crate::settings::Settings;
use crate::velocity_from_angle;

pub struct GameState {
    pub settings: Settings,
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    pub round: RoundState,
    pub camera: CameraFollowController,
    pub entities: EntityRegistry,
    /// Strategy records for live bricks, keyed by entity id
    pub bricks: BTreeMap<EntityId, Brick>,
    /// The life-bearing ball
    pub ball: EntityId,
    /// The permanent player paddle
    pub paddle: EntityId,
    pub extra_paddle: Option<EntityId>,
    /// HUD hearts, oldest first
    pub life_icons: Vec<EntityId>,
    pub lives_display: EntityId,
    /// Simulation tick counter
    pub time_ticks: u64,
    resolver: StrategyResolver,
    factory: Box<dyn EntityFactory>,
}

impl GameState {
    /// Build a round with the stock strategy tables
    pub fn new(settings: Settings, seed: u64) -> Result<Self, ConfigError> {
        Self::with_resolver(settings, seed, StrategyResolver::default())
    }

    pub fn with_resolver(
        settings: Settings,
        seed: u64,
        resolver: StrategyResolver,
    ) -> Result<Self, ConfigError> {
        let factory = Box::new(StandardFactory::new(&settings));
        Self::with_collaborators(settings, seed, resolver, factory)
    }

    /// Build a round with a custom entity factory
    pub fn with_collaborators(
        settings: Settings,
        seed: u64,
        resolver: StrategyResolver,
        factory: Box<dyn EntityFactory>,
    ) -> Result<Self, ConfigError> {
        settings.validate()?;
        let bricks = settings.brick_count()?;
        let mut state = Self {
            settings,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            round: RoundState::new(bricks),
            camera: CameraFollowController::new(),
            entities: EntityRegistry::new(),
            bricks: BTreeMap::new(),
            ball: 0,
            paddle: 0,
            extra_paddle: None,
            life_icons: Vec::new(),
            lives_display: 0,
            time_ticks: 0,
            resolver,
            factory,
        };
        state.populate();
        log::info!(
            "Board {}x{} ready (seed {seed})",
            state.settings.rows,
            state.settings.columns
        );
        Ok(state)
    }

    /// Board dimensions
    pub fn board(&self) -> Vec2 {
        Vec2::new(self.settings.window_width, self.settings.window_height)
    }

    /// Start a fresh round on the same board geometry. Strategies are drawn
    /// again from the continuing RNG stream.
    pub fn reset(&mut self) {
        self.populate();
        log::info!("Round reset: {} bricks", self.round.active_bricks());
    }

    /// Rebuild every entity and counter from scratch
    fn populate(&mut self) {
        self.entities.clear();
        self.bricks.clear();
        self.camera.detach();
        self.extra_paddle = None;
        self.life_icons.clear();
        self.time_ticks = 0;

        let board = self.board();

        let background = self.factory.create(EntityKind::Background);
        self.entities.add(background, Layer::Background);

        let ball = self.factory.create(EntityKind::Ball);
        self.ball = self.entities.add(ball, Layer::Default);
        self.reset_ball();

        let mut paddle = self.factory.create(EntityKind::Paddle);
        paddle.center = Vec2::new(board.x * 0.5, board.y - PADDLE_OFFSET_FROM_BOTTOM);
        self.paddle = self.entities.add(paddle, Layer::Default);

        self.build_walls();
        self.build_bricks();

        self.round.reset(self.bricks.len() as u32);
        self.build_lives_hud();
    }

    /// Top, left and right walls collide; the bottom one is decoration
    fn build_walls(&mut self) {
        let board = self.board();
        let side = Vec2::new(WALL_THICKNESS, board.y + WALL_THICKNESS);

        let top = self.factory.create(EntityKind::Wall);
        self.entities.add(top, Layer::Default);

        for x in [0.0, board.x - WALL_THICKNESS] {
            let mut wall = self.factory.create(EntityKind::Wall);
            wall.size = side;
            wall.set_top_left(Vec2::new(x, 0.0));
            self.entities.add(wall, Layer::Default);
        }

        let mut bottom = self.factory.create(EntityKind::Wall);
        bottom.size = Vec2::new(board.x, WALL_THICKNESS);
        bottom.set_top_left(Vec2::new(0.0, board.y));
        self.entities.add(bottom, Layer::Ui);
    }

    fn build_bricks(&mut self) {
        let mut y = WALL_THICKNESS + BRICK_SPACING;
        for _ in 0..self.settings.rows {
            let mut x = WALL_THICKNESS + BRICK_SPACING;
            for _ in 0..self.settings.columns {
                let mut entity = self.factory.create(EntityKind::Brick);
                let top_left = Vec2::new(x, y);
                entity.set_top_left(top_left);
                let width = entity.size.x;

                let effect = self.resolver.resolve(&mut self.rng);
                let id = self.entities.add(entity, Layer::Static);
                self.bricks.insert(id, Brick::new(top_left, width, effect));

                x += BRICK_SPACING + width;
            }
            y += BRICK_SPACING + BRICK_HEIGHT;
        }
    }

    fn build_lives_hud(&mut self) {
        let mut display = self.factory.create(EntityKind::TextDisplay);
        display.set_top_left(self.hud_origin());
        self.lives_display = self.entities.add(display, Layer::Ui);

        for _ in 0..self.round.lives() {
            self.push_life_icon();
        }
    }

    fn hud_origin(&self) -> Vec2 {
        Vec2::new(WALL_THICKNESS, self.settings.window_height - HEART_OFFSET_FROM_BOTTOM)
    }

    fn push_life_icon(&mut self) {
        let slot = self.life_icons.len() as f32 + 1.0;
        let mut icon = self.factory.create(EntityKind::LifeIcon);
        let offset = Vec2::new(slot * (UI_ICON_SIZE + UI_ICON_SPACING), 0.0);
        icon.set_top_left(self.hud_origin() + offset);
        let id = self.entities.add(icon, Layer::Ui);
        self.life_icons.push(id);
    }

    /// Center the main ball and launch it diagonally in a random quadrant
    pub fn reset_ball(&mut self) {
        let center = self.board() * 0.5;
        let vx = if self.rng.random_bool(0.5) {
            -BALL_INITIAL_SPEED
        } else {
            BALL_INITIAL_SPEED
        };
        let vy = if self.rng.random_bool(0.5) {
            -BALL_INITIAL_SPEED
        } else {
            BALL_INITIAL_SPEED
        };
        if let Some(ball) = self.entities.get_mut(self.ball) {
            ball.center = center;
            ball.vel = Vec2::new(vx, vy);
        }
    }

    /// Main ball's bounce counter
    pub fn ball_bounces(&self) -> u32 {
        self.entities.get(self.ball).map_or(0, |b| b.collisions)
    }

    /// Two pucks from `center`, each heading off at a random angle in [0, π]
    pub fn spawn_pucks(&mut self, center: Vec2) {
        for _ in 0..PUCKS_PER_SPAWN {
            let theta = self.rng.random_range(0.0..=PI);
            let mut puck = self.factory.create(EntityKind::Puck);
            puck.center = center;
            puck.vel = velocity_from_angle(BALL_INITIAL_SPEED, theta);
            self.entities.add(puck, Layer::Default);
        }
    }

    /// Second paddle at the board center, unless the paddle cap is reached
    pub fn spawn_extra_paddle(&mut self) -> bool {
        if !self.round.try_add_paddle() {
            return false;
        }
        let mut paddle = self.factory.create(EntityKind::ExtraPaddle);
        paddle.center = self.board() * 0.5;
        self.extra_paddle = Some(self.entities.add(paddle, Layer::Default));
        log::debug!("Extra paddle spawned");
        true
    }

    /// Count a ball/puck hit on the extra paddle; it vanishes on the last one
    pub fn extra_paddle_hit(&mut self, id: EntityId) {
        let Some(paddle) = self.entities.get_mut(id) else {
            return;
        };
        paddle.collisions += 1;
        if paddle.collisions < EXTRA_PADDLE_HITS {
            return;
        }
        if self.entities.remove(id, Layer::Default) {
            self.round.paddle_destroyed();
            self.extra_paddle = None;
            log::debug!("Extra paddle worn out");
        }
    }

    /// Follow `target` with the camera if it is the main ball and no follow is active
    pub fn follow_camera(&mut self, target: EntityId) -> bool {
        if target != self.ball {
            return false;
        }
        let bounces = self.ball_bounces();
        self.camera.activate(target, bounces)
    }

    /// Falling heart from `center`
    pub fn spawn_heart(&mut self, center: Vec2) {
        let mut heart = self.factory.create(EntityKind::Heart);
        heart.center = center;
        self.entities.add(heart, Layer::Default);
    }

    /// The main paddle caught a heart
    pub fn collect_heart(&mut self, id: EntityId) {
        if !self.entities.remove(id, Layer::Default) {
            return;
        }
        if self.round.gain_life() {
            self.push_life_icon();
            log::info!("Extra life! ({} left)", self.round.lives());
        }
    }

    /// The main ball left the board
    pub fn lose_life(&mut self) -> LifeLoss {
        let loss = self.round.ball_lost();
        if let Some(icon) = self.life_icons.pop() {
            self.entities.remove(icon, Layer::Ui);
        }
        self.reset_ball();
        log::info!("Ball lost ({} lives left)", self.round.lives());
        loss
    }

    pub fn lives_tone(&self) -> LivesTone {
        self.round.lives_tone()
    }

    pub fn camera_view(&self) -> Option<CameraView> {
        self.camera.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::effect::{Effect, EffectKind, EffectRegistry};

    #[test]
    fn test_default_board_layout() {
        let state = GameState::new(Settings::default(), 12345).unwrap();
        assert_eq!(state.bricks.len(), 56);
        assert_eq!(state.entities.count(EntityKind::Brick), 56);
        assert_eq!(state.round.active_bricks(), 56);
        assert_eq!(state.entities.count(EntityKind::Wall), 4);
        assert_eq!(state.life_icons.len(), DEFAULT_LIVES as usize);
        assert_eq!(state.entities.layer_of(state.lives_display), Some(Layer::Ui));

        // First brick sits inside the top-left corner, last one flush with the right wall
        let first = state.bricks.values().next().unwrap();
        assert_eq!(first.position, Vec2::new(20.0, 20.0));
        let last = state.bricks.values().last().unwrap();
        let right_edge = last.position.x + last.width;
        assert!((right_edge - (WINDOW_WIDTH - WALL_THICKNESS - BRICK_SPACING)).abs() < 1e-3);
        assert!((last.position.y - (20.0 + 6.0 * 25.0)).abs() < 1e-3);
    }

    #[test]
    fn test_ball_launch_is_diagonal() {
        let state = GameState::new(Settings::default(), 9).unwrap();
        let ball = state.entities.get(state.ball).unwrap();
        assert_eq!(ball.center, Vec2::new(350.0, 250.0));
        assert_eq!(ball.vel.x.abs(), BALL_INITIAL_SPEED);
        assert_eq!(ball.vel.y.abs(), BALL_INITIAL_SPEED);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let settings = Settings {
            rows: 0,
            ..Default::default()
        };
        assert!(GameState::new(settings, 1).is_err());

        let settings = Settings {
            rows: 30,
            ..Default::default()
        };
        assert!(matches!(
            GameState::new(settings, 1),
            Err(ConfigError::TooManyRows { .. })
        ));
    }

    #[test]
    fn test_every_brick_above_paddle_on_tallest_board() {
        let settings = Settings {
            rows: 17,
            ..Default::default()
        };
        let state = GameState::new(settings, 3).unwrap();
        let paddle = state.entities.get(state.paddle).unwrap();
        let paddle_top = paddle.top_left().y;
        assert_eq!(state.bricks.len(), 17 * 8);
        for &id in state.bricks.keys() {
            let brick = state.entities.get(id).unwrap();
            assert!(brick.top_left().y + brick.size.y <= paddle_top);
        }
    }

    #[test]
    fn test_heart_catch_caps_lives() {
        let mut state = GameState::new(Settings::default(), 1).unwrap();
        state.spawn_heart(Vec2::new(100.0, 100.0));
        let heart = state.entities.ids_of(EntityKind::Heart)[0];
        state.collect_heart(heart);
        assert_eq!(state.round.lives(), MAX_LIVES);
        assert_eq!(state.life_icons.len(), MAX_LIVES as usize);

        state.spawn_heart(Vec2::new(100.0, 100.0));
        let heart = state.entities.ids_of(EntityKind::Heart)[0];
        state.collect_heart(heart);
        assert_eq!(state.round.lives(), MAX_LIVES);
        assert_eq!(state.life_icons.len(), MAX_LIVES as usize);
        assert_eq!(state.entities.count(EntityKind::Heart), 0);
    }

    #[test]
    fn test_extra_paddle_wears_out() {
        let mut state = GameState::new(Settings::default(), 1).unwrap();
        assert!(state.spawn_extra_paddle());
        let extra = state.extra_paddle.unwrap();
        for _ in 0..EXTRA_PADDLE_HITS - 1 {
            state.extra_paddle_hit(extra);
            assert_eq!(state.round.active_paddles(), 2);
        }
        state.extra_paddle_hit(extra);
        assert_eq!(state.round.active_paddles(), 1);
        assert!(!state.entities.contains(extra));
        assert_eq!(state.extra_paddle, None);

        // Room for another one now
        assert!(state.spawn_extra_paddle());
    }

    #[test]
    fn test_lose_life_removes_icon_and_recenters() {
        let mut state = GameState::new(Settings::default(), 1).unwrap();
        state.entities.get_mut(state.ball).unwrap().center = Vec2::new(300.0, 600.0);
        assert_eq!(state.lose_life(), LifeLoss::Respawn);
        assert_eq!(state.life_icons.len(), 2);
        assert_eq!(state.entities.count(EntityKind::LifeIcon), 2);
        assert_eq!(state.entities.get(state.ball).unwrap().center, Vec2::new(350.0, 250.0));
    }

    #[test]
    fn test_reset_redraws_strategies() {
        let resolver = StrategyResolver::new(EffectRegistry::standard());
        let mut state = GameState::with_resolver(Settings::default(), 77, resolver).unwrap();
        let before: Vec<Effect> = state.bricks.values().map(|b| b.effect().clone()).collect();

        state.spawn_extra_paddle();
        state.lose_life();
        state.reset();

        let after: Vec<Effect> = state.bricks.values().map(|b| b.effect().clone()).collect();
        assert_eq!(after.len(), 56);
        assert_ne!(before, after, "56 fresh draws matching exactly is vanishingly unlikely");
        assert_eq!(state.round.lives(), DEFAULT_LIVES);
        assert_eq!(state.round.active_paddles(), 1);
        assert_eq!(state.entities.count(EntityKind::ExtraPaddle), 0);
        assert_eq!(state.life_icons.len(), DEFAULT_LIVES as usize);
    }

    #[test]
    fn test_only_registry_binds_every_brick() {
        let resolver = StrategyResolver::new(EffectRegistry::only(EffectKind::SpawnExtraLife));
        let state = GameState::with_resolver(Settings::default(), 3, resolver).unwrap();
        assert!(state.bricks.values().all(|b| *b.effect() == Effect::SpawnExtraLife));
    }
}
