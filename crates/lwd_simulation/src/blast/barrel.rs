//! ExplosiveBarrel — накопление урона до взрыва
//!
//! State machine: `Alive → Exploding → Destroyed`.
//! - Alive: принимает попадания, health убывает
//! - Exploding: флаг выставлен, идёт resolution (синхронно, в том же тике)
//! - Destroyed: entity деспавнен
//!
//! Флаг взрыва монотонный: выставляется ДО любой работы взрыва, поэтому
//! цепная реакция в циклическом графе бочек не взрывает бочку повторно.

use bevy::prelude::*;
use crate::blast::BlastConfig;
use crate::combat::{Damageable, Hit, HitResponse};

/// Порог health, ниже которого бочка взрывается
pub const DEPLETION_EPSILON: f32 = f32::EPSILON;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum BarrelState {
    Alive,
    Exploding,
}

/// Взрывающаяся бочка
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct ExplosiveBarrel {
    pub config: BlastConfig,
    pub health: f32,
    state: BarrelState,
    /// Последний атакующий (attribution для вторичных попаданий)
    pub last_attacker: Option<Entity>,
}

impl Default for ExplosiveBarrel {
    fn default() -> Self {
        Self::new(BlastConfig::default())
    }
}

impl ExplosiveBarrel {
    pub fn new(config: BlastConfig) -> Self {
        let config = config.sanitized();
        Self {
            health: config.health,
            config,
            state: BarrelState::Alive,
            last_attacker: None,
        }
    }

    pub fn state(&self) -> BarrelState {
        self.state
    }

    pub fn has_exploded(&self) -> bool {
        self.state != BarrelState::Alive
    }

    /// Переход Alive → Exploding
    ///
    /// Возвращает `false`, если бочка уже взорвалась (повторный вход).
    pub fn arm(&mut self) -> bool {
        if self.has_exploded() {
            return false;
        }
        self.state = BarrelState::Exploding;
        true
    }
}

impl Damageable for ExplosiveBarrel {
    fn on_hit(&mut self, hit: &Hit) -> HitResponse {
        if self.has_exploded() {
            return HitResponse::Ignored;
        }

        self.last_attacker = hit.attacker;
        self.health -= hit.damage;

        if self.health <= DEPLETION_EPSILON {
            HitResponse::Depleted
        } else {
            HitResponse::Absorbed
        }
    }
}
