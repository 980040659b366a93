//! LWD Simulation Core
//!
//! ECS-симуляция на Bevy 0.16: взрывающиеся бочки и интерактивные props уровня.
//!
//! Симуляция решает правила (урон, falloff, цепные реакции, state machines),
//! хост (движок) — физический step, рендер, звук и VFX по событиям.

use bevy::ecs::event::event_update_system;
use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod blast;
pub mod combat;
pub mod components;
pub mod logger;
pub mod props;

// Re-export для удобства
pub use blast::{
    hit_barrel, BarrelExploded, BlastConfig, CameraShake, EffectTemplate, ExplosiveBarrel,
    OverlapPool,
};
pub use combat::{
    CombatPlugin, DamageDealt, DamageSource, Damageable, Dead, EntityDied, Hit, HitResponse,
};
pub use components::*;
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger, LogLevel,
    LogPrinter,
};
pub use props::{PropsPlugin, SmokeValve, SoundTrigger, TrainLoopMover};

/// Частота FixedUpdate (simulation tick)
pub const SIMULATION_HZ: f64 = 60.0;

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Time::<Fixed>::from_hz(SIMULATION_HZ));
        // seed из create_headless_app не перетираем
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }
        app.add_plugins((CombatPlugin, PropsPlugin));
    }
}

/// Seeded RNG для раскладки уровня (бочки, ящики)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed), seed }
    }

    /// Точка на земле (y = 0) внутри квадрата ±half_extent
    pub fn ground_point(&mut self, half_extent: f32) -> Vec3 {
        let x = self.rng.gen_range(-half_extent..half_extent);
        let z = self.rng.gen_range(-half_extent..half_extent);
        Vec3::new(x, 0.0, z)
    }
}

/// Headless App: MinimalPlugins, seeded RNG, fixed tick, консольный logger
pub fn create_headless_app(seed: u64) -> App {
    init_logger();
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(SIMULATION_HZ));
    app
}

/// Один фиксированный тик без зависимости от wall clock
///
/// Повторяет то, что делает FixedMain за один шаг:
/// 1. ротация event буферов (события живут два тика)
/// 2. `Time<Fixed>` += timestep, generic `Time` переключается в fixed контекст
/// 3. FixedUpdate
///
/// После вызова `Events::iter_current_update_events` отдаёт ровно события этого тика.
pub fn step_fixed(app: &mut App) {
    let world = app.world_mut();

    if let Err(err) = world.run_system_cached(event_update_system) {
        log_error(&format!("Event update failed: {}", err));
    }

    let timestep = world.resource::<Time<Fixed>>().timestep();
    world.resource_mut::<Time<Fixed>>().advance_by(timestep);
    let fixed = world.resource::<Time<Fixed>>().as_generic();
    *world.resource_mut::<Time>() = fixed;

    world.run_schedule(FixedUpdate);
}

/// Снимок одного типа компонентов: (entity index, Debug) по возрастанию index
///
/// Два прогона с одним seed дают равные снимки.
pub fn world_snapshot<T: Component + std::fmt::Debug>(world: &mut World) -> Vec<(u32, String)> {
    let mut snapshot: Vec<(u32, String)> = world
        .query::<(Entity, &T)>()
        .iter(world)
        .map(|(entity, component)| (entity.index(), format!("{:?}", component)))
        .collect();
    snapshot.sort_by_key(|(index, _)| *index);
    snapshot
}
