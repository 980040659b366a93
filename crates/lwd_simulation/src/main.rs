//! Headless симуляция LWD
//!
//! Склад бочек со seeded раскладкой: стреляем в одну и смотрим,
//! как расходится цепная реакция.

use bevy::prelude::*;

use lwd_simulation::{
    create_headless_app, log_info, set_log_level, step_fixed, BarrelExploded, BlastConfig,
    ColliderProxy, DamageSource, DeterministicRng, ExplosiveBarrel, Health, Hit, LayerMask,
    LogLevel, SimulationPlugin,
};

const BARREL_COUNT: usize = 24;
const CRATE_COUNT: usize = 12;
const YARD_HALF_SIZE: f32 = 10.0;

fn main() {
    let seed = 42;
    println!("Starting LWD headless barrel yard (seed: {})", seed);

    let mut app = create_headless_app(seed);
    // debug строки (despawn, vent) в бинаре не нужны
    set_log_level(LogLevel::Info);
    app.add_plugins(SimulationPlugin);

    let first = populate_yard(app.world_mut());

    app.world_mut()
        .send_event(Hit::new(first, 60.0, DamageSource::Ranged));

    let mut exploded = 0;
    // 2 секунды симуляции
    for tick in 0..120 {
        step_fixed(&mut app);

        // step_fixed ротирует буферы: текущие события = события этого тика
        let world = app.world();
        let events = world.resource::<Events<BarrelExploded>>();
        let this_tick = events.iter_current_update_events().count();
        if this_tick > 0 {
            exploded += this_tick;
            log_info(&format!("Tick {}: {} barrels exploded ({} total)", tick, this_tick, exploded));
        }
    }

    let world = app.world_mut();
    let survivors = world.query::<&ExplosiveBarrel>().iter(world).count();
    let damaged = world
        .query::<&Health>()
        .iter(world)
        .filter(|health| health.current < health.max)
        .count();

    println!(
        "Simulation complete! exploded: {}, barrels left: {}, crates damaged: {}",
        exploded, survivors, damaged
    );
}

/// Раскладка склада из seeded RNG, возвращает первую бочку
fn populate_yard(world: &mut World) -> Entity {
    let positions: Vec<(Vec3, bool)> = {
        let mut rng = world.resource_mut::<DeterministicRng>();
        (0..BARREL_COUNT + CRATE_COUNT)
            .map(|index| (rng.ground_point(YARD_HALF_SIZE), index < BARREL_COUNT))
            .collect()
    };

    let mut first = Entity::PLACEHOLDER;

    for (position, is_barrel) in positions {
        let entity = if is_barrel {
            world
                .spawn((
                    ExplosiveBarrel::new(BlastConfig::default()),
                    Transform::from_translation(position),
                    ColliderProxy::cuboid(Vec3::new(0.4, 0.6, 0.4)).with_layers(LayerMask::PROPS),
                ))
                .id()
        } else {
            world
                .spawn((
                    Health::new(100.0),
                    Transform::from_translation(position),
                    ColliderProxy::cuboid(Vec3::splat(0.5)).with_layers(LayerMask::PROPS),
                ))
                .id()
        };

        if first == Entity::PLACEHOLDER {
            first = entity;
        }
    }

    first
}
