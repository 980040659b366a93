//! Blast tuning (data-driven)
//!
//! Конфиг чистится один раз — при загрузке/создании бочки (`sanitized`).
//! Resolution дальше считает параметры валидными и ничего не проверяет.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use crate::components::{LayerMask, PrefabPath};

/// Шаблон alert'а на VFX взрыва (AI слышит взрыв)
#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertTemplate {
    /// Радиус слышимости (метры)
    pub range: f32,
}

impl Default for AlertTemplate {
    fn default() -> Self {
        Self { range: 20.0 }
    }
}

/// Шаблон визуального эффекта (хост инстанцирует prefab)
#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectTemplate {
    pub prefab: PrefabPath,
    /// Есть alert → generator заполняется атакующим актором
    pub alert: Option<AlertTemplate>,
}

impl Default for EffectTemplate {
    fn default() -> Self {
        Self {
            prefab: PrefabPath::default(),
            alert: None,
        }
    }
}

impl EffectTemplate {
    pub fn new(prefab: impl Into<String>) -> Self {
        Self {
            prefab: PrefabPath::new(prefab),
            alert: None,
        }
    }

    pub fn with_alert(mut self, alert: AlertTemplate) -> Self {
        self.alert = Some(alert);
        self
    }
}

/// Параметры взрывающейся бочки
#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct BlastConfig {
    /// Сколько урона бочка держит до взрыва
    pub health: f32,
    /// Радиус взрыва (открытая граница: ровно на радиусе — мимо)
    pub radius: f32,
    /// Урон в центре взрыва (линейный falloff к краю)
    pub center_damage: f32,
    /// Импульс для rigid bodies в радиусе
    pub force: f32,
    /// Смещение центра импульса вниз → тела подбрасывает вверх
    pub upwards_modifier: f32,
    pub shake_duration: f32,
    pub shake_intensity: f32,
    pub affected_layers: LayerMask,
    pub apply_physics_force: bool,
    /// Бочки в радиусе получают урон синхронно (цепная реакция)
    pub chain_reaction: bool,
    pub effect: Option<EffectTemplate>,
}

impl Default for BlastConfig {
    fn default() -> Self {
        Self {
            health: 50.0,
            radius: 4.5,
            center_damage: 150.0,
            force: 800.0,
            upwards_modifier: 0.0,
            shake_duration: 0.5,
            shake_intensity: 100.0,
            affected_layers: LayerMask::ALL,
            apply_physics_force: true,
            chain_reaction: true,
            effect: None,
        }
    }
}

impl BlastConfig {
    pub const MIN_HEALTH: f32 = 1.0;
    pub const MIN_RADIUS: f32 = 0.1;

    /// Clamp в допустимые диапазоны (health ≥ 1, radius ≥ 0.1, остальное ≥ 0)
    pub fn sanitized(mut self) -> Self {
        self.health = self.health.max(Self::MIN_HEALTH);
        self.radius = self.radius.max(Self::MIN_RADIUS);
        self.center_damage = self.center_damage.max(0.0);
        self.force = self.force.max(0.0);
        self.shake_duration = self.shake_duration.max(0.0);
        self.shake_intensity = self.shake_intensity.max(0.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BlastConfig::default();
        assert_eq!(config.health, 50.0);
        assert_eq!(config.radius, 4.5);
        assert_eq!(config.center_damage, 150.0);
        assert_eq!(config.force, 800.0);
        assert_eq!(config.affected_layers, LayerMask::ALL);
        assert!(config.apply_physics_force);
        assert!(config.chain_reaction);
        assert!(config.effect.is_none());
    }

    #[test]
    fn test_sanitized_clamps_everything() {
        let config = BlastConfig {
            health: -5.0,
            radius: 0.0,
            center_damage: -1.0,
            force: -100.0,
            shake_duration: -0.5,
            shake_intensity: -3.0,
            ..default()
        }
        .sanitized();

        assert_eq!(config.health, 1.0);
        assert_eq!(config.radius, 0.1);
        assert_eq!(config.center_damage, 0.0);
        assert_eq!(config.force, 0.0);
        assert_eq!(config.shake_duration, 0.0);
        assert_eq!(config.shake_intensity, 0.0);
    }

    #[test]
    fn test_sanitized_keeps_valid_values() {
        let config = BlastConfig::default();
        assert_eq!(config.clone().sanitized(), config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: BlastConfig =
            serde_json::from_str(r#"{ "radius": 6.0, "chain_reaction": false }"#).unwrap();

        assert_eq!(config.radius, 6.0);
        assert!(!config.chain_reaction);
        assert_eq!(config.health, 50.0);
        assert_eq!(config.center_damage, 150.0);
    }

    #[test]
    fn test_effect_template_from_json() {
        let config: BlastConfig = serde_json::from_str(
            r#"{ "effect": { "prefab": { "path": "fx/barrel_boom" }, "alert": { "range": 35.0 } } }"#,
        )
        .unwrap();

        let effect = config.effect.unwrap();
        assert_eq!(effect.prefab.path, "fx/barrel_boom");
        assert_eq!(effect.alert, Some(AlertTemplate { range: 35.0 }));
    }
}
