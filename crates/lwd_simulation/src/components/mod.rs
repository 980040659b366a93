//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: живые существа (Actor, Health, Tag)
//! - world: присутствие в мире (LayerMask, ColliderProxy, Dormant, PrefabPath)
//!
//! Компоненты конкретных механик (бочки, вентили, поезд) живут в своих модулях.

pub mod actor;
pub mod world;

// Re-exports для удобного импорта
pub use actor::*;
pub use world::*;
