//! SmokeValve — вентиль, выпускающий дым при попадании
//!
//! Анти-спам: после сработавшего попадания вентиль глух `cooldown` секунд.
//! Cooldown перезапускается даже без шаблона дыма.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use crate::blast::{EffectInstance, EffectTemplate};
use crate::combat::{Damageable, DespawnAfter, Hit, HitResponse};

#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct SmokeValveConfig {
    pub smoke: Option<EffectTemplate>,
    /// Дым следует за вентилем (child entity)
    pub parent_to_valve: bool,
    /// Точка выхода дыма в локальных координатах вентиля
    pub local_offset: Vec3,
    /// Через сколько секунд убрать дым (0 = не убирать)
    pub destroy_after: f32,
    /// Минимальный интервал между срабатываниями
    pub cooldown: f32,
}

impl Default for SmokeValveConfig {
    fn default() -> Self {
        Self {
            smoke: None,
            parent_to_valve: true,
            local_offset: Vec3::ZERO,
            destroy_after: 6.0,
            cooldown: 0.3,
        }
    }
}

impl SmokeValveConfig {
    pub fn sanitized(mut self) -> Self {
        self.destroy_after = self.destroy_after.max(0.0);
        self.cooldown = self.cooldown.max(0.0);
        self
    }
}

#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct SmokeValve {
    pub config: SmokeValveConfig,
    pub cooldown_left: f32,
}

impl SmokeValve {
    pub fn new(config: SmokeValveConfig) -> Self {
        Self {
            config: config.sanitized(),
            cooldown_left: 0.0,
        }
    }

    pub fn tick(&mut self, delta: f32) {
        if self.cooldown_left > 0.0 {
            self.cooldown_left -= delta;
        }
    }

    /// Точка и локальность дыма относительно вентиля
    ///
    /// parent_to_valve → локальный offset (дым — child), иначе world точка.
    pub fn smoke_transform(&self, valve_transform: &Transform) -> Transform {
        if self.config.parent_to_valve {
            Transform::from_translation(self.config.local_offset)
        } else {
            Transform::from_translation(valve_transform.transform_point(self.config.local_offset))
        }
    }
}

impl Damageable for SmokeValve {
    fn on_hit(&mut self, _hit: &Hit) -> HitResponse {
        if self.cooldown_left > 0.0 {
            return HitResponse::Ignored;
        }

        self.cooldown_left = self.config.cooldown;
        HitResponse::Absorbed
    }
}

/// Маркер дыма от вентиля
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct ValveSmoke;

/// Система: cooldown тик
pub fn tick_valve_cooldowns(mut valves: Query<&mut SmokeValve>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();

    for mut valve in valves.iter_mut() {
        valve.tick(delta);
    }
}

/// Система: попадание по вентилю → дым
pub fn valve_smoke_on_hit(
    mut commands: Commands,
    mut hits: EventReader<Hit>,
    mut valves: Query<(&mut SmokeValve, Option<&Transform>)>,
    time: Res<Time>,
) {
    for hit in hits.read() {
        let Ok((mut valve, transform)) = valves.get_mut(hit.target) else {
            continue;
        };

        if crate::combat::deliver(Some(&mut *valve), hit) == HitResponse::Ignored {
            continue;
        }

        let Some(template) = valve.config.smoke.clone() else {
            continue;
        };

        let valve_transform = transform.copied().unwrap_or_default();
        let mut smoke = commands.spawn((
            ValveSmoke,
            EffectInstance { source: hit.target },
            template.prefab,
            valve.smoke_transform(&valve_transform),
        ));

        if valve.config.parent_to_valve {
            smoke.insert(ChildOf(hit.target));
        }

        if valve.config.destroy_after > 0.0 {
            smoke.insert(DespawnAfter {
                despawn_time: time.elapsed_secs() + valve.config.destroy_after,
            });
        }

        crate::logger::log(&format!("Valve {:?} vented smoke (hit by {:?})", hit.target, hit.attacker));
    }
}
