//! Побочные эффекты взрыва: camera shake, VFX, alert
//!
//! Симуляция только заявляет эффект (event / entity с PrefabPath),
//! воспроизведение — на стороне хоста.

use bevy::prelude::*;
use crate::blast::EffectTemplate;
use crate::components::Actor;

/// Event: тряска камеры (fire-and-forget)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct CameraShake {
    pub position: Vec3,
    pub intensity: f32,
    pub duration: f32,
}

/// Инстанс визуального эффекта (хост спавнит prefab)
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct EffectInstance {
    /// Entity, породивший эффект (бочка, вентиль)
    pub source: Entity,
}

/// Alert на эффекте: AI поблизости реагирует на шум
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Alert {
    /// Актор, ответственный за шум
    pub generator: Option<Entity>,
    pub range: f32,
}

/// Актор, которому приписываем эффект
///
/// Атакующий засчитывается, только если он живой актор мира.
pub fn resolve_actor(world: &World, attacker: Option<Entity>) -> Option<Entity> {
    attacker.filter(|entity| world.get::<Actor>(*entity).is_some())
}

/// Спавнит эффект по шаблону в точке `position`
pub fn spawn_effect(
    world: &mut World,
    template: &EffectTemplate,
    source: Entity,
    position: Vec3,
    generator: Option<Entity>,
) -> Entity {
    let mut effect = world.spawn((
        EffectInstance { source },
        template.prefab.clone(),
        Transform::from_translation(position),
    ));

    if let Some(alert) = &template.alert {
        effect.insert(Alert {
            generator,
            range: alert.range,
        });
    }

    effect.id()
}
