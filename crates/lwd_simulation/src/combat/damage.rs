//! Damage система для Health-получателей
//!
//! Читает `Hit` события и применяет урон к `Health`:
//! - DamageDealt на каждое принятое попадание (UI, звуки, эффекты)
//! - EntityDied при переходе alive → dead
//! - Dead маркер для визуальных эффектов

use bevy::prelude::*;
use crate::combat::{Damageable, DamageSource, Hit, HitResponse};
use crate::components::Health;

/// Событие: урон нанесен
#[derive(Event, Debug, Clone)]
pub struct DamageDealt {
    pub attacker: Option<Entity>,
    pub target: Entity,
    pub damage: f32,
    pub source: DamageSource,
    pub impact_point: Vec3,
    pub impact_normal: Vec3,
    pub target_died: bool,
}

/// Событие: entity умер (health <= 0)
#[derive(Event, Debug, Clone)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Компонент-маркер: entity мертв (Health <= 0)
///
/// Деспавн не автоматический — трупы остаются на месте.
#[derive(Component, Debug)]
pub struct Dead;

/// Компонент-маркер: деспавн entity после указанного времени
///
/// Используется для временных объектов (дым, VFX).
#[derive(Component, Debug)]
pub struct DespawnAfter {
    /// Время деспавна (в секундах от старта игры)
    pub despawn_time: f32,
}

impl Damageable for Health {
    fn on_hit(&mut self, hit: &Hit) -> HitResponse {
        if !self.is_alive() {
            return HitResponse::Ignored;
        }

        self.take_damage(hit.damage);

        if self.is_alive() {
            HitResponse::Absorbed
        } else {
            HitResponse::Depleted
        }
    }
}

/// Система: apply damage от Hit событий к Health
///
/// Попадания по entity без Health молча игнорируются (best-effort доставка).
pub fn apply_hits_to_health(
    mut hits: EventReader<Hit>,
    mut targets: Query<&mut Health>,
    mut damage_dealt_events: EventWriter<DamageDealt>,
    mut entity_died_events: EventWriter<EntityDied>,
) {
    for hit in hits.read() {
        let Ok(mut health) = targets.get_mut(hit.target) else {
            continue;
        };

        let before = health.current;
        let response = crate::combat::deliver(Some(&mut *health), hit);
        if response == HitResponse::Ignored {
            continue;
        }

        let target_died = response == HitResponse::Depleted;

        damage_dealt_events.write(DamageDealt {
            attacker: hit.attacker,
            target: hit.target,
            damage: before - health.current,
            source: hit.source,
            impact_point: hit.position,
            impact_normal: hit.normal,
            target_died,
        });

        if target_died {
            entity_died_events.write(EntityDied {
                entity: hit.target,
                killer: hit.attacker,
            });

            crate::logger::log_info(&format!(
                "Entity {:?} killed by {:?} ({:?})",
                hit.target, hit.attacker, hit.source
            ));
        }
    }
}

/// Система: пометить мертвых маркером Dead
pub fn mark_dead_on_death(
    mut commands: Commands,
    mut death_events: EventReader<EntityDied>,
) {
    for event in death_events.read() {
        if let Ok(mut entity_commands) = commands.get_entity(event.entity) {
            entity_commands.insert(Dead);
        }
    }
}

/// Система: деспавн entities с истёкшим DespawnAfter timeout
pub fn despawn_after_timeout(
    mut commands: Commands,
    query: Query<(Entity, &DespawnAfter)>,
    time: Res<Time>,
) {
    let current_time = time.elapsed_secs();

    for (entity, despawn_after) in query.iter() {
        if current_time >= despawn_after.despawn_time {
            crate::logger::log(&format!("Despawning entity {:?} (timeout)", entity));
            commands.entity(entity).despawn();
        }
    }
}
