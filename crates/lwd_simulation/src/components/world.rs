//! World presence компоненты: LayerMask, ColliderProxy, Dormant, PrefabPath
//!
//! Физический движок хоста authoritative для коллизий. Симуляция держит
//! упрощённый proxy коллайдера (shape + слои + trigger flag), этого хватает
//! для blast overlap query и trigger volumes.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Битовая маска слоёв (на каком слое объект / какие слои задевает query)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(u32::MAX);

    /// Layer 1: Default
    pub const DEFAULT: Self = Self(0b1);
    /// Layer 2: Actors (игрок, NPC)
    pub const ACTORS: Self = Self(0b10);
    /// Layer 3: Environment (стены, пол, статика)
    pub const ENVIRONMENT: Self = Self(0b100);
    /// Layer 4: Props (бочки, вентили, ящики)
    pub const PROPS: Self = Self(0b1000);
    /// Layer 5: Projectiles
    pub const PROJECTILES: Self = Self(0b1_0000);

    pub fn intersects(self, other: LayerMask) -> bool {
        self.0 & other.0 != 0
    }

    pub fn union(self, other: LayerMask) -> Self {
        Self(self.0 | other.0)
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Форма proxy коллайдера
///
/// Масштаб Transform не учитываем — размеры задаются в world units.
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub enum ProxyShape {
    Sphere { radius: f32 },
    Cuboid { half_extents: Vec3 },
    /// Меш, аппроксимированный своим oriented bounding box.
    /// Только convex меш отвечает на closest-point query.
    Mesh { half_extents: Vec3, convex: bool },
}

impl ProxyShape {
    pub fn supports_closest_point(&self) -> bool {
        matches!(self, ProxyShape::Mesh { convex: true, .. })
    }
}

/// Proxy коллайдера хоста
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct ColliderProxy {
    pub shape: ProxyShape,
    pub layers: LayerMask,
    pub is_trigger: bool,
}

impl ColliderProxy {
    pub fn sphere(radius: f32) -> Self {
        Self {
            shape: ProxyShape::Sphere { radius },
            layers: LayerMask::DEFAULT,
            is_trigger: false,
        }
    }

    pub fn cuboid(half_extents: Vec3) -> Self {
        Self {
            shape: ProxyShape::Cuboid { half_extents },
            layers: LayerMask::DEFAULT,
            is_trigger: false,
        }
    }

    pub fn mesh(half_extents: Vec3, convex: bool) -> Self {
        Self {
            shape: ProxyShape::Mesh { half_extents, convex },
            layers: LayerMask::DEFAULT,
            is_trigger: false,
        }
    }

    pub fn with_layers(mut self, layers: LayerMask) -> Self {
        self.layers = layers;
        self
    }

    pub fn as_trigger(mut self) -> Self {
        self.is_trigger = true;
        self
    }

    /// Ближайшая к `point` точка коллайдера
    ///
    /// Convex меш — настоящая точка на поверхности (или сама точка, если она внутри).
    /// Остальные формы отвечают origin'ом коллайдера.
    pub fn closest_point(&self, transform: &Transform, point: Vec3) -> Vec3 {
        match self.shape {
            ProxyShape::Mesh { half_extents, convex: true } => {
                closest_point_on_box(transform, half_extents, point)
            }
            _ => transform.translation,
        }
    }

    /// Лежит ли точка внутри формы (для trigger volumes)
    pub fn contains_point(&self, transform: &Transform, point: Vec3) -> bool {
        match self.shape {
            ProxyShape::Sphere { radius } => {
                point.distance_squared(transform.translation) <= radius * radius
            }
            ProxyShape::Cuboid { half_extents } | ProxyShape::Mesh { half_extents, .. } => {
                let local = transform.rotation.inverse() * (point - transform.translation);
                local.abs().cmple(half_extents).all()
            }
        }
    }
}

fn closest_point_on_box(transform: &Transform, half_extents: Vec3, point: Vec3) -> Vec3 {
    let local = transform.rotation.inverse() * (point - transform.translation);
    let clamped = local.clamp(-half_extents, half_extents);
    transform.translation + transform.rotation * clamped
}

/// Маркер: entity деактивирован (невидим для spatial queries)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Dormant;

/// Prefab path для визуального представления (data-driven)
///
/// Хост по этому пути инстанцирует визуал (VFX, модель).
#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct PrefabPath {
    pub path: String,
}

impl Default for PrefabPath {
    fn default() -> Self {
        Self {
            path: "prefabs/fx/explosion".to_string(),
        }
    }
}

impl PrefabPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}
