//! Blast resolution — взрыв бочки и цепная реакция
//!
//! Работает exclusive (`&mut World`): весь взрыв (query → урон → импульсы →
//! цепная реакция → деспавн) проходит синхронно, без точек приостановки.
//! Бочка в радиусе получает попадание дважды: синхронно (chain reaction,
//! рекурсивно) и обычной доставкой через очередь, которую `resolve_barrel_hits`
//! разбирает в том же тике. Рекурсия конечна, т.к. каждая бочка взрывается
//! не более одного раза.
//!
//! Бочки между собой не хранят ссылок: соседи находятся overlap query
//! на каждом взрыве заново.

use bevy::ecs::event::EventCursor;
use bevy::prelude::*;
use bevy_rapier3d::prelude::{ExternalImpulse, RigidBody};

use crate::blast::{
    blast_contact, explosion_impulse, resolve_actor, spawn_effect, CameraShake, ExplosiveBarrel,
    BLAST_EPSILON,
};
use crate::combat::{DamageSource, Hit, HitResponse};
use crate::components::{ColliderProxy, Dormant, LayerMask};

/// Максимум коллайдеров, которые видит один взрыв
pub const MAX_BLAST_OVERLAPS: usize = 128;

/// Результат overlap query (снимок на момент взрыва)
#[derive(Debug, Clone, Copy)]
pub struct Overlap {
    pub entity: Entity,
    pub transform: Transform,
    pub collider: ColliderProxy,
    /// Dynamic rigid body → получает импульс
    pub dynamic_body: bool,
}

/// Пул буферов overlap query
///
/// Один буфер на уровень рекурсии цепной реакции; после прогрева взрывы
/// не аллоцируют.
#[derive(Resource, Debug, Default)]
pub struct OverlapPool {
    free: Vec<Vec<Overlap>>,
}

impl OverlapPool {
    pub fn acquire(&mut self) -> Vec<Overlap> {
        let mut buffer = self
            .free
            .pop()
            .unwrap_or_else(|| Vec::with_capacity(MAX_BLAST_OVERLAPS));
        buffer.clear();
        buffer
    }

    pub fn release(&mut self, mut buffer: Vec<Overlap>) {
        buffer.clear();
        self.free.push(buffer);
    }

    /// Сколько буферов лежит в пуле
    pub fn pooled(&self) -> usize {
        self.free.len()
    }
}

/// Event: бочка взорвалась (ровно один раз на бочку)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct BarrelExploded {
    pub barrel: Entity,
    pub position: Vec3,
    pub attacker: Option<Entity>,
}

/// Overlap query: коллайдеры с origin в пределах `radius` от `center`
///
/// Trigger'ы, dormant entities и чужие слои пропускаются.
/// Результат обрезается до `MAX_BLAST_OVERLAPS`.
pub fn overlap_sphere(
    world: &mut World,
    center: Vec3,
    radius: f32,
    layers: LayerMask,
    out: &mut Vec<Overlap>,
) {
    out.clear();

    let radius_sq = radius * radius;
    let mut query = world.query_filtered::<
        (Entity, &Transform, &ColliderProxy, Option<&RigidBody>, Has<ChildOf>),
        Without<Dormant>,
    >();

    for (entity, local, collider, body, is_child) in query.iter(world) {
        if out.len() >= MAX_BLAST_OVERLAPS {
            break;
        }
        if collider.is_trigger || !collider.layers.intersects(layers) {
            continue;
        }

        let transform = if is_child {
            world_transform(world, entity).unwrap_or(*local)
        } else {
            *local
        };
        if transform.translation.distance_squared(center) > radius_sq {
            continue;
        }

        out.push(Overlap {
            entity,
            transform,
            collider: *collider,
            dynamic_body: matches!(body, Some(RigidBody::Dynamic)),
        });
    }
}

/// Попадание по бочке (синхронно, с возможным взрывом)
///
/// Entity без `ExplosiveBarrel` → `Ignored`.
pub fn hit_barrel(world: &mut World, hit: &Hit, pool: &mut OverlapPool) -> HitResponse {
    let response = {
        let Some(mut barrel) = world.get_mut::<ExplosiveBarrel>(hit.target) else {
            return HitResponse::Ignored;
        };
        crate::combat::deliver(Some(&mut *barrel), hit)
    };

    if response == HitResponse::Depleted {
        explode(world, hit.target, pool);
    }

    response
}

/// Взрыв бочки
///
/// Порядок:
/// 1. arm (Alive → Exploding), повторный вход — выход
/// 2. camera shake + VFX (alert generator = атакующий актор)
/// 3. overlap query → для каждой цели: импульс, урон с falloff, попадание
/// 4. chain reaction: бочка в радиусе (или её родитель) дополнительно
///    получает попадание синхронно
/// 5. BarrelExploded + деспавн
pub fn explode(world: &mut World, barrel_entity: Entity, pool: &mut OverlapPool) {
    let (config, attacker) = {
        let Some(mut barrel) = world.get_mut::<ExplosiveBarrel>(barrel_entity) else {
            return;
        };
        if !barrel.arm() {
            return;
        }
        (barrel.config.clone(), barrel.last_attacker)
    };

    let Some(center) = world_transform(world, barrel_entity).map(|t| t.translation) else {
        crate::logger::log_warning(&format!(
            "Barrel {:?} exploded without Transform, blast skipped",
            barrel_entity
        ));
        world.despawn(barrel_entity);
        return;
    };

    world.send_event(CameraShake {
        position: center,
        intensity: config.shake_intensity,
        duration: config.shake_duration,
    });

    if let Some(template) = &config.effect {
        let generator = resolve_actor(world, attacker);
        spawn_effect(world, template, barrel_entity, center, generator);
    }

    let mut overlaps = pool.acquire();
    overlap_sphere(world, center, config.radius, config.affected_layers, &mut overlaps);

    let mut damaged = 0usize;

    for overlap in overlaps.iter() {
        if overlap.entity == barrel_entity {
            continue;
        }

        let Some(contact) =
            blast_contact(center, config.radius, &overlap.collider, &overlap.transform)
        else {
            continue;
        };

        if config.apply_physics_force && overlap.dynamic_body {
            let impulse = explosion_impulse(
                center,
                overlap.transform.translation,
                config.force,
                config.upwards_modifier,
                contact.fraction,
            );
            add_impulse(world, overlap.entity, impulse);
        }

        let damage = config.center_damage * contact.fraction;
        if damage <= BLAST_EPSILON {
            continue;
        }

        let hit = Hit {
            position: contact.point,
            normal: contact.normal,
            damage,
            attacker,
            target: overlap.entity,
            source: DamageSource::Explosion,
            aux: 0,
        };
        damaged += 1;

        // Chain reaction: соседняя бочка (коллайдер может быть на child) получает
        // попадание синхронно, сверх обычной доставки через очередь
        if config.chain_reaction {
            if let Some(other) = barrel_in_ancestors(world, overlap.entity) {
                if other != barrel_entity {
                    hit_barrel(world, &Hit { target: other, ..hit.clone() }, pool);
                }
            }
        }

        world.send_event(hit);
    }

    pool.release(overlaps);

    world.send_event(BarrelExploded {
        barrel: barrel_entity,
        position: center,
        attacker,
    });

    crate::logger::log_info(&format!(
        "Barrel {:?} exploded at {:?} ({} targets hit, attacker {:?})",
        barrel_entity, center, damaged, attacker
    ));

    world.despawn(barrel_entity);
}

/// Transform в world space: локальный, собранный вверх по `ChildOf`
pub fn world_transform(world: &World, entity: Entity) -> Option<Transform> {
    let mut transform = *world.get::<Transform>(entity)?;
    let mut current = entity;

    while let Some(parent) = world.get::<ChildOf>(current).map(ChildOf::parent) {
        if let Some(parent_transform) = world.get::<Transform>(parent) {
            transform = parent_transform.mul_transform(transform);
        }
        current = parent;
    }

    Some(transform)
}

/// Ближайшая бочка вверх по иерархии (включая сам entity)
pub fn barrel_in_ancestors(world: &World, entity: Entity) -> Option<Entity> {
    let mut current = entity;
    loop {
        if world.get::<ExplosiveBarrel>(current).is_some() {
            return Some(current);
        }
        current = world.get::<ChildOf>(current)?.parent();
    }
}

fn add_impulse(world: &mut World, entity: Entity, impulse: Vec3) {
    // Цель могла исчезнуть во вложенном взрыве
    let Ok(mut target) = world.get_entity_mut(entity) else {
        return;
    };

    if target.contains::<ExternalImpulse>() {
        if let Some(mut external) = target.get_mut::<ExternalImpulse>() {
            external.impulse += impulse;
        }
    } else {
        target.insert(ExternalImpulse {
            impulse,
            ..default()
        });
    }
}

/// Система: попадания по бочкам из event queue
///
/// Exclusive — взрыв и цепная реакция требуют `&mut World`.
/// Попадания, которые взрывы кладут в очередь, разбираются в том же тике:
/// читаем, пока очередь не опустеет. Цикл конечен, т.к. каждая бочка
/// взрывается не более одного раза.
pub fn resolve_barrel_hits(world: &mut World, mut cursor: Local<EventCursor<Hit>>) {
    loop {
        let hits: Vec<Hit> = {
            let events = world.resource::<Events<Hit>>();
            cursor
                .read(events)
                .filter(|hit| world.get::<ExplosiveBarrel>(hit.target).is_some())
                .cloned()
                .collect()
        };

        if hits.is_empty() {
            return;
        }

        world.resource_scope(|world, mut pool: Mut<OverlapPool>| {
            for hit in &hits {
                hit_barrel(world, hit, &mut pool);
            }
        });
    }
}
