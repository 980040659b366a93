//! SoundTrigger — звук, когда игрок входит в trigger volume
//!
//! Детекция входа: брутфорс по proxy коллайдерам (центр вошёл в форму trigger'а).
//! Воспроизведение — хост по событию PlaySound.

use bevy::prelude::*;
use crate::components::{ColliderProxy, Dormant, Tag};

/// Trigger volume: кто сейчас внутри (для edge detection входа)
///
/// Форма берётся из `ColliderProxy` того же entity (`is_trigger = true`).
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct TriggerVolume {
    pub occupants: Vec<Entity>,
}

/// Event: entity вошёл в trigger
#[derive(Event, Debug, Clone, PartialEq)]
pub struct TriggerEntered {
    pub trigger: Entity,
    pub other: Entity,
}

/// Источник звука на entity (аналог audio source хоста)
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct AudioEmitter {
    /// Клип по умолчанию (играется, если trigger без своего клипа)
    pub default_clip: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundRequest {
    /// Разово проиграть конкретный клип поверх текущего
    OneShot(String),
    /// Запустить клип по умолчанию emitter'а
    Default,
}

/// Event: проиграть звук на emitter'е
#[derive(Event, Debug, Clone, PartialEq)]
pub struct PlaySound {
    pub emitter: Entity,
    pub request: SoundRequest,
}

#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct SoundTrigger {
    /// Тег, на который реагируем
    pub required_tag: String,
    pub clip: Option<String>,
    pub play_once: bool,
    pub has_played: bool,
}

impl Default for SoundTrigger {
    fn default() -> Self {
        Self {
            required_tag: Tag::PLAYER.to_string(),
            clip: None,
            play_once: false,
            has_played: false,
        }
    }
}

impl SoundTrigger {
    pub fn with_clip(clip: impl Into<String>) -> Self {
        Self {
            clip: Some(clip.into()),
            ..default()
        }
    }

    /// Реакция на вход `other_tag` в trigger
    ///
    /// `None` — звук не играем (уже играл, чужой тег, нет emitter'а).
    /// Без emitter'а trigger не считается сработавшим.
    pub fn on_enter(&mut self, other_tag: Option<&Tag>, has_emitter: bool) -> Option<SoundRequest> {
        if self.play_once && self.has_played {
            return None;
        }
        if !other_tag.is_some_and(|tag| tag.is(&self.required_tag)) {
            return None;
        }
        if !has_emitter {
            return None;
        }

        self.has_played = true;

        Some(match &self.clip {
            Some(clip) => SoundRequest::OneShot(clip.clone()),
            None => SoundRequest::Default,
        })
    }
}

/// Система: edge detection входа в trigger volumes
pub fn detect_trigger_entries(
    mut volumes: Query<(Entity, &Transform, &ColliderProxy, &mut TriggerVolume), Without<Dormant>>,
    bodies: Query<(Entity, &Transform, &ColliderProxy), (Without<TriggerVolume>, Without<Dormant>)>,
    mut entered: EventWriter<TriggerEntered>,
) {
    for (trigger, trigger_transform, trigger_shape, mut volume) in volumes.iter_mut() {
        let mut inside = Vec::new();

        for (other, transform, collider) in bodies.iter() {
            if collider.is_trigger {
                continue;
            }
            if trigger_shape.contains_point(trigger_transform, transform.translation) {
                inside.push(other);
            }
        }

        for other in inside.iter().copied() {
            if !volume.occupants.contains(&other) {
                entered.write(TriggerEntered { trigger, other });
            }
        }

        volume.occupants = inside;
    }
}

/// Система: вход в trigger → PlaySound
pub fn play_sound_on_trigger(
    mut entered: EventReader<TriggerEntered>,
    mut triggers: Query<(&mut SoundTrigger, Has<AudioEmitter>)>,
    tags: Query<&Tag>,
    mut sounds: EventWriter<PlaySound>,
) {
    for event in entered.read() {
        let Ok((mut trigger, has_emitter)) = triggers.get_mut(event.trigger) else {
            continue;
        };

        let Some(request) = trigger.on_enter(tags.get(event.other).ok(), has_emitter) else {
            continue;
        };

        crate::logger::log(&format!(
            "Trigger {:?} entered by {:?}: {:?}",
            event.trigger, event.other, request
        ));

        sounds.write(PlaySound {
            emitter: event.trigger,
            request,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_triggers_one_shot_clip() {
        let mut trigger = SoundTrigger::with_clip("sfx/horn");
        let request = trigger.on_enter(Some(&Tag::player()), true);

        assert_eq!(request, Some(SoundRequest::OneShot("sfx/horn".to_string())));
        assert!(trigger.has_played);
    }

    #[test]
    fn test_without_clip_plays_default() {
        let mut trigger = SoundTrigger::default();
        assert_eq!(trigger.on_enter(Some(&Tag::player()), true), Some(SoundRequest::Default));
    }

    #[test]
    fn test_other_tags_ignored() {
        let mut trigger = SoundTrigger::default();

        assert_eq!(trigger.on_enter(Some(&Tag::new("Enemy")), true), None);
        assert_eq!(trigger.on_enter(None, true), None);
        assert!(!trigger.has_played);
    }

    #[test]
    fn test_missing_emitter_does_not_mark_played() {
        let mut trigger = SoundTrigger { play_once: true, ..default() };

        assert_eq!(trigger.on_enter(Some(&Tag::player()), false), None);
        assert!(!trigger.has_played);

        assert!(trigger.on_enter(Some(&Tag::player()), true).is_some());
    }

    #[test]
    fn test_play_once() {
        let mut trigger = SoundTrigger { play_once: true, ..default() };

        assert!(trigger.on_enter(Some(&Tag::player()), true).is_some());
        assert!(trigger.on_enter(Some(&Tag::player()), true).is_none());
    }

    #[test]
    fn test_repeatable_by_default() {
        let mut trigger = SoundTrigger::default();

        assert!(trigger.on_enter(Some(&Tag::player()), true).is_some());
        assert!(trigger.on_enter(Some(&Tag::player()), true).is_some());
    }
}
