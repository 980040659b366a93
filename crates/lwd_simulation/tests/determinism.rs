//! Тесты детерминизма
//!
//! Один и тот же seed → одинаковая раскладка склада → одинаковая
//! цепная реакция и одинаковое итоговое здоровье ящиков.

use bevy::prelude::*;
use lwd_simulation::*;

const BARREL_COUNT: usize = 40;
const CRATE_COUNT: usize = 20;
const TICK_COUNT: usize = 120;

#[test]
fn test_determinism_same_seed() {
    const SEED: u64 = 12345;

    let (snapshot1, exploded1) = run_barrel_yard(SEED);
    let (snapshot2, exploded2) = run_barrel_yard(SEED);

    assert_eq!(exploded1, exploded2);
    assert_eq!(
        snapshot1, snapshot2,
        "Симуляция с одинаковым seed ({}) дала разные результаты!",
        SEED
    );
}

#[test]
fn test_determinism_multiple_runs() {
    const SEED: u64 = 42;

    // Запускаем 5 раз — все должны быть идентичны
    let runs: Vec<_> = (0..5).map(|_| run_barrel_yard(SEED)).collect();

    for (i, run) in runs.iter().enumerate().skip(1) {
        assert_eq!(runs[0], *run, "Прогон {} дал результат отличный от прогона 0", i);
    }
}

#[test]
fn test_every_barrel_explodes_at_most_once() {
    for seed in [1, 7, 99, 2024] {
        let (_, exploded) = run_barrel_yard(seed);

        let mut unique = exploded.clone();
        unique.sort();
        unique.dedup();

        assert_eq!(unique.len(), exploded.len(), "seed {}: повторный взрыв", seed);
        assert!(!exploded.is_empty() && exploded.len() <= BARREL_COUNT);
    }
}

#[test]
fn test_plugin_keeps_app_seed() {
    let mut app = create_headless_app(7);
    app.add_plugins(SimulationPlugin);

    let mut rng = app.world_mut().resource_mut::<DeterministicRng>();
    assert_eq!(rng.seed, 7);

    let point = rng.ground_point(8.0);
    assert_eq!(point.y, 0.0);
    assert!(point.x.abs() < 8.0 && point.z.abs() < 8.0);
}

/// Запускает склад и возвращает (snapshot Health, индексы взорвавшихся бочек)
fn run_barrel_yard(seed: u64) -> (Vec<(u32, String)>, Vec<u32>) {
    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin);

    let world = app.world_mut();
    let layout: Vec<Vec3> = {
        let mut rng = world.resource_mut::<DeterministicRng>();
        (0..BARREL_COUNT + CRATE_COUNT)
            .map(|_| rng.ground_point(8.0))
            .collect()
    };

    let mut barrels = Vec::new();
    for (index, position) in layout.into_iter().enumerate() {
        let transform = Transform::from_translation(position);
        if index < BARREL_COUNT {
            barrels.push(
                world
                    .spawn((ExplosiveBarrel::new(BlastConfig::default()), transform, ColliderProxy::cuboid(Vec3::splat(0.4))))
                    .id(),
            );
        } else {
            world.spawn((Health::new(200.0), transform, ColliderProxy::cuboid(Vec3::splat(0.5))));
        }
    }

    world.send_event(Hit::new(barrels[0], 50.0, DamageSource::Ranged));

    let mut exploded = Vec::new();
    for _ in 0..TICK_COUNT {
        step_fixed(&mut app);
        exploded.extend(
            app.world()
                .resource::<Events<BarrelExploded>>()
                .iter_current_update_events()
                .map(|event| event.barrel.index()),
        );
    }

    (world_snapshot::<Health>(app.world_mut()), exploded)
}
