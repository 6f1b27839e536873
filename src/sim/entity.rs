//! Entity registry with typed layers, and the kind-tag entity factory
//!
//! Entities are plain boxes (center + size + velocity). Everything the
//! renderer needs to draw them is keyed off `EntityKind`; the core never
//! sees asset paths.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::settings::Settings;

pub type EntityId = u32;

/// Render/collision layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layer {
    Background,
    /// Bricks
    Static,
    /// Balls, pucks, paddles, walls, hearts
    Default,
    /// HUD; never collides
    Ui,
}

impl Layer {
    pub const ALL: [Layer; 4] = [Layer::Background, Layer::Static, Layer::Default, Layer::Ui];

    #[inline]
    fn index(self) -> usize {
        match self {
            Layer::Background => 0,
            Layer::Static => 1,
            Layer::Default => 2,
            Layer::Ui => 3,
        }
    }
}

/// Spawnable entity kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Background,
    Wall,
    Ball,
    Puck,
    Brick,
    Heart,
    Paddle,
    ExtraPaddle,
    LifeIcon,
    TextDisplay,
}

impl EntityKind {
    /// Entities that bounce off walls, bricks and paddles
    pub fn is_bouncer(self) -> bool {
        matches!(self, EntityKind::Ball | EntityKind::Puck)
    }

    /// Entities a bouncer reflects off
    pub fn is_solid(self) -> bool {
        matches!(
            self,
            EntityKind::Wall | EntityKind::Brick | EntityKind::Paddle | EntityKind::ExtraPaddle
        )
    }

    /// Entities steered by the player
    pub fn is_paddle(self) -> bool {
        matches!(self, EntityKind::Paddle | EntityKind::ExtraPaddle)
    }
}

/// An axis-aligned box with a velocity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub kind: EntityKind,
    pub center: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    /// Collisions this entity has taken part in (ball bounces, paddle hits)
    pub collisions: u32,
}

impl Entity {
    pub fn new(kind: EntityKind, size: Vec2) -> Self {
        Self {
            kind,
            center: Vec2::ZERO,
            size,
            vel: Vec2::ZERO,
            collisions: 0,
        }
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        self.size * 0.5
    }

    #[inline]
    pub fn top_left(&self) -> Vec2 {
        self.center - self.half_extents()
    }

    pub fn set_top_left(&mut self, top_left: Vec2) {
        self.center = top_left + self.half_extents();
    }
}

/// All live entities, bucketed by layer and ordered by id
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    layers: [BTreeMap<EntityId, Entity>; 4],
    next_id: EntityId,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place an entity on a layer and return its id
    pub fn add(&mut self, entity: Entity, layer: Layer) -> EntityId {
        self.next_id += 1;
        let id = self.next_id;
        self.layers[layer.index()].insert(id, entity);
        id
    }

    /// Remove an entity from `layer`. Returns false if it was not there.
    pub fn remove(&mut self, id: EntityId, layer: Layer) -> bool {
        self.take(id, layer).is_some()
    }

    /// Remove and return an entity from `layer`
    pub fn take(&mut self, id: EntityId, layer: Layer) -> Option<Entity> {
        self.layers[layer.index()].remove(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.layers.iter().find_map(|layer| layer.get(&id))
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.layers.iter_mut().find_map(|layer| layer.get_mut(&id))
    }

    pub fn layer_of(&self, id: EntityId) -> Option<Layer> {
        Layer::ALL
            .into_iter()
            .find(|layer| self.layers[layer.index()].contains_key(&id))
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.layer_of(id).is_some()
    }

    /// Every live entity, layer by layer
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, Layer, &Entity)> {
        Layer::ALL.into_iter().flat_map(move |layer| {
            self.layers[layer.index()]
                .iter()
                .map(move |(&id, entity)| (id, layer, entity))
        })
    }

    pub fn iter_layer(&self, layer: Layer) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.layers[layer.index()].iter().map(|(&id, e)| (id, e))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut Entity)> {
        self.layers
            .iter_mut()
            .flat_map(|layer| layer.iter_mut().map(|(&id, e)| (id, e)))
    }

    /// Ids of every live entity of `kind`, ascending
    pub fn ids_of(&self, kind: EntityKind) -> Vec<EntityId> {
        let mut ids: Vec<_> = self
            .iter()
            .filter(|(_, _, e)| e.kind == kind)
            .map(|(id, _, _)| id)
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.iter().filter(|(_, _, e)| e.kind == kind).count()
    }

    pub fn len(&self) -> usize {
        self.layers.iter().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entity. Ids keep increasing so stale ids never alias.
    pub fn clear(&mut self) {
        for layer in &mut self.layers {
            layer.clear();
        }
    }
}

/// Builds ready-to-place entities from a kind tag
pub trait EntityFactory {
    fn create(&self, kind: EntityKind) -> Entity;
}

/// Default sizes and initial velocities for every kind
#[derive(Debug, Clone)]
pub struct StandardFactory {
    board: Vec2,
    brick_width: f32,
}

impl StandardFactory {
    pub fn new(settings: &Settings) -> Self {
        Self {
            board: Vec2::new(settings.window_width, settings.window_height),
            brick_width: settings.brick_width(),
        }
    }
}

impl EntityFactory for StandardFactory {
    fn create(&self, kind: EntityKind) -> Entity {
        let icon = Vec2::splat(UI_ICON_SIZE);
        match kind {
            EntityKind::Background => {
                let mut bg = Entity::new(kind, self.board);
                bg.center = self.board * 0.5;
                bg
            }
            EntityKind::Wall => {
                let mut wall = Entity::new(kind, Vec2::new(self.board.x, WALL_THICKNESS));
                wall.set_top_left(Vec2::ZERO);
                wall
            }
            EntityKind::Ball => Entity::new(kind, Vec2::splat(BALL_SIZE)),
            EntityKind::Puck => Entity::new(kind, Vec2::splat(BALL_SIZE * PUCK_SCALE)),
            EntityKind::Brick => Entity::new(kind, Vec2::new(self.brick_width, BRICK_HEIGHT)),
            EntityKind::Heart => {
                Entity::new(kind, icon).with_velocity(Vec2::new(0.0, HEART_SPEED))
            }
            EntityKind::Paddle | EntityKind::ExtraPaddle => {
                Entity::new(kind, Vec2::new(PADDLE_WIDTH, PADDLE_HEIGHT))
            }
            EntityKind::LifeIcon | EntityKind::TextDisplay => Entity::new(kind, icon),
        }
    }
}
