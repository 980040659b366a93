//! Hit — единый формат попадания (пули, melee, взрывы)
//!
//! Доставка best-effort: отправитель пишет `Hit` в event queue, получатели
//! (`Damageable` компоненты) читают попадания по своему `target`.
//! Entity без получателя просто игнорирует попадание — это не ошибка.

use bevy::prelude::*;

/// Источник урона
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum DamageSource {
    Melee,
    Ranged,
    Explosion,
    Environmental,
}

/// Event: попадание по entity
///
/// Создаётся на каждую доставку, передаётся по значению, после чтения отбрасывается.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct Hit {
    /// Точка попадания (world space)
    pub position: Vec3,
    /// Нормаль поверхности в точке попадания
    pub normal: Vec3,
    pub damage: f32,
    /// Кто нанёс (только для attribution, lifetime не держим)
    pub attacker: Option<Entity>,
    pub target: Entity,
    pub source: DamageSource,
    /// Свободный слот payload (взрывы пишут 0)
    pub aux: i32,
}

impl Hit {
    pub fn new(target: Entity, damage: f32, source: DamageSource) -> Self {
        Self {
            position: Vec3::ZERO,
            normal: Vec3::Y,
            damage,
            attacker: None,
            target,
            source,
            aux: 0,
        }
    }

    pub fn from_attacker(mut self, attacker: Entity) -> Self {
        self.attacker = Some(attacker);
        self
    }

    pub fn at(mut self, position: Vec3, normal: Vec3) -> Self {
        self.position = position;
        self.normal = normal;
        self
    }
}

/// Реакция получателя на попадание
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitResponse {
    /// Получатель отсутствует или попадание отброшено guard'ом
    Ignored,
    /// Попадание принято, получатель жив
    Absorbed,
    /// Попадание исчерпало получателя (смерть / взрыв)
    Depleted,
}

/// Capability: entity умеет принимать попадания
pub trait Damageable {
    fn on_hit(&mut self, hit: &Hit) -> HitResponse;
}

/// Best-effort доставка: нет получателя → `Ignored`
pub fn deliver<T: Damageable>(receiver: Option<&mut T>, hit: &Hit) -> HitResponse {
    match receiver {
        Some(receiver) => receiver.on_hit(hit),
        None => HitResponse::Ignored,
    }
}
