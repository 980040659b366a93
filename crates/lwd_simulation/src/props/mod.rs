//! Props — интерактивное окружение уровня
//!
//! - valve: вентиль выпускает дым при попадании
//! - sound_trigger: звук при входе игрока в trigger volume
//! - train: поезд по маршруту с фиксированной каденцией

use bevy::prelude::*;

pub mod sound_trigger;
pub mod train;
pub mod valve;


pub use sound_trigger::{
    detect_trigger_entries, play_sound_on_trigger, AudioEmitter, PlaySound, SoundRequest,
    SoundTrigger, TriggerEntered, TriggerVolume,
};
pub use train::{
    drive_train_loops, RoutePoses, TrainFrame, TrainLoopConfig, TrainLoopMover, TrainPhase,
    TrainRoute, TrainYield,
};
pub use valve::{tick_valve_cooldowns, valve_smoke_on_hit, SmokeValve, SmokeValveConfig, ValveSmoke};

use crate::combat::Hit;

/// Props Plugin
///
/// Порядок в FixedUpdate:
/// 1. tick_valve_cooldowns → valve_smoke_on_hit
/// 2. detect_trigger_entries → play_sound_on_trigger
/// 3. drive_train_loops
pub struct PropsPlugin;

impl Plugin for PropsPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<Hit>()
            .add_event::<TriggerEntered>()
            .add_event::<PlaySound>();

        app.add_systems(
            FixedUpdate,
            (
                tick_valve_cooldowns,
                valve_smoke_on_hit,
                detect_trigger_entries,
                play_sound_on_trigger,
                drive_train_loops,
            )
                .chain(),
        );
    }
}
