//! Базовые компоненты акторов: Actor, Health, Tag

use bevy::prelude::*;

/// Актор (игрок, NPC, враг) — базовый компонент для живых существ
///
/// Автоматически добавляет Health через Required Components.
/// Используется для attribution: alert generator у взрыва = актор-атакующий.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
#[require(Health)]
pub struct Actor {
    /// Stable ID фракции
    pub faction_id: u64,
}

/// Здоровье
///
/// Инвариант: 0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0) // Default 100 HP
    }
}

impl Health {
    pub fn new(max: f32) -> Self {
        let max = max.max(0.0);
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.current = (self.current - amount.max(0.0)).max(0.0);
    }

    pub fn heal(&mut self, amount: f32) {
        self.current = (self.current + amount.max(0.0)).min(self.max);
    }
}

/// Тег entity (например "Player") — для фильтрации trigger'ов
#[derive(Component, Debug, Clone, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Tag(pub String);

impl Tag {
    pub const PLAYER: &'static str = "Player";

    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn player() -> Self {
        Self::new(Self::PLAYER)
    }

    pub fn is(&self, tag: &str) -> bool {
        self.0 == tag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_damage() {
        let mut health = Health::new(100.0);
        assert_eq!(health.current, 100.0);

        health.take_damage(30.0);
        assert_eq!(health.current, 70.0);
        assert!(health.is_alive());

        health.take_damage(100.0); // Clamp к 0
        assert_eq!(health.current, 0.0);
        assert!(!health.is_alive());
    }

    #[test]
    fn test_health_heal() {
        let mut health = Health::new(100.0);
        health.take_damage(50.0);

        health.heal(30.0);
        assert_eq!(health.current, 80.0);

        health.heal(100.0); // Clamped to max
        assert_eq!(health.current, 100.0);
    }

    #[test]
    fn test_negative_amounts_ignored() {
        let mut health = Health::new(40.0);
        health.take_damage(-10.0);
        assert_eq!(health.current, 40.0);
    }

    #[test]
    fn test_tag_match() {
        assert!(Tag::player().is("Player"));
        assert!(!Tag::new("Enemy").is("Player"));
    }
}
