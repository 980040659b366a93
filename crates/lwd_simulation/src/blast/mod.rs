//! Blast module — взрывающиеся бочки
//!
//! ECS ответственность:
//! - ExplosiveBarrel: health, флаг взрыва, attribution
//! - Resolution: overlap query, linear falloff, импульсы, цепная реакция
//! - Events: CameraShake, BarrelExploded, вторичные Hit
//!
//! Хост ответственность:
//! - Физический step (применяет ExternalImpulse)
//! - VFX по PrefabPath, camera shake, звук

pub mod barrel;
pub mod config;
pub mod effects;
pub mod falloff;
pub mod resolve;


pub use barrel::{BarrelState, ExplosiveBarrel, DEPLETION_EPSILON};
pub use config::{AlertTemplate, BlastConfig, EffectTemplate};
pub use effects::{resolve_actor, spawn_effect, Alert, CameraShake, EffectInstance};
pub use falloff::{blast_contact, explosion_impulse, falloff_fraction, BlastContact, BLAST_EPSILON};
pub use resolve::{
    barrel_in_ancestors, explode, hit_barrel, overlap_sphere, resolve_barrel_hits,
    world_transform, BarrelExploded, Overlap, OverlapPool, MAX_BLAST_OVERLAPS,
};
