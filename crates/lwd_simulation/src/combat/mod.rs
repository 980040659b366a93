//! Combat system module
//!
//! ECS ответственность:
//! - Hit: единый формат попадания + best-effort доставка (Damageable)
//! - Damage rules: Health, взрывы бочек, цепные реакции
//! - Events: DamageDealt, EntityDied, BarrelExploded, CameraShake
//!
//! Хост ответственность:
//! - Пули/melee: collision detection → пишет Hit
//! - Физика, VFX, звук

use bevy::prelude::*;

pub mod damage;
pub mod hit;

// Re-export основных типов
pub use damage::{
    apply_hits_to_health, despawn_after_timeout, mark_dead_on_death, DamageDealt, Dead,
    DespawnAfter, EntityDied,
};
pub use hit::{deliver, DamageSource, Damageable, Hit, HitResponse};

use crate::blast::{resolve_barrel_hits, BarrelExploded, CameraShake, OverlapPool};

/// Combat Plugin
///
/// Регистрирует combat системы в FixedUpdate (60Hz).
///
/// Порядок выполнения:
/// 1. resolve_barrel_hits — попадания по бочкам, взрывы, цепные реакции
/// 2. apply_hits_to_health — урон Health (включая вторичные попадания взрывов)
/// 3. mark_dead_on_death — маркер Dead
/// 4. despawn_after_timeout — уборка временных объектов
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<Hit>()
            .add_event::<DamageDealt>()
            .add_event::<EntityDied>()
            .add_event::<BarrelExploded>()
            .add_event::<CameraShake>()
            .init_resource::<OverlapPool>();

        app.add_systems(
            FixedUpdate,
            (
                resolve_barrel_hits,
                apply_hits_to_health,
                mark_dead_on_death,
                despawn_after_timeout,
            )
                .chain(),
        );
    }
}
