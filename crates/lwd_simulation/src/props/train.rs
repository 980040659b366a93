//! TrainLoopMover — поезд, проезжающий маршрут с фиксированной каденцией
//!
//! Явная state machine вместо корутины: каждый тик `tick(dt, route)`
//! продвигает фазу и возвращает `TrainFrame` (что сделать с поездом) +
//! yield (ждём кадр / ждём таймер / закончили).
//!
//! Фазы: Pending → (Delaying) → Travelling ⇄ Resting, терминальная Halted.
//! Каденция start-to-start: пауза = interval − время проезда.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use crate::components::Dormant;

#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainLoopConfig {
    /// Интервал между стартами (секунды)
    pub interval_secs: f32,
    /// Задержка перед первым проездом
    pub initial_delay_secs: f32,
    pub speed: f32,
    /// Смотреть вдоль горизонтального направления маршрута
    pub face_direction: bool,
    pub use_fixed_rotation: bool,
    /// Euler в градусах (X, Y, Z), порядок применения Y·X·Z
    pub fixed_euler_degrees: Vec3,
}

impl Default for TrainLoopConfig {
    fn default() -> Self {
        Self {
            interval_secs: 60.0,
            initial_delay_secs: 0.0,
            speed: 12.0,
            face_direction: true,
            use_fixed_rotation: true,
            fixed_euler_degrees: Vec3::new(270.0, 270.0, 0.0),
        }
    }
}

impl TrainLoopConfig {
    pub const MIN_SPEED: f32 = 0.01;
    pub const MIN_DURATION: f32 = 0.01;

    pub fn sanitized(mut self) -> Self {
        self.interval_secs = self.interval_secs.max(0.0);
        self.initial_delay_secs = self.initial_delay_secs.max(0.0);
        self.speed = self.speed.max(Self::MIN_SPEED);
        self
    }

    pub fn fixed_rotation(&self) -> Quat {
        let euler = self.fixed_euler_degrees;
        Quat::from_euler(
            EulerRot::YXZ,
            euler.y.to_radians(),
            euler.x.to_radians(),
            euler.z.to_radians(),
        )
    }
}

/// Позы точек маршрута на текущий тик
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutePoses {
    pub start: Vec3,
    pub start_rotation: Quat,
    pub end: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum TrainPhase {
    Pending,
    Delaying { remaining: f32 },
    Travelling {
        from: Vec3,
        to: Vec3,
        t: f32,
        duration: f32,
        cycle_elapsed: f32,
    },
    Resting { remaining: f32 },
    Halted,
}

/// Что делает state machine после тика
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrainYield {
    /// Продолжить в следующем кадре
    Frame,
    /// Ждём таймер (секунд осталось)
    Wait(f32),
    /// Цикл завершён (маршрут не задан или mover выключен)
    Done,
}

/// Изменения поезда за тик
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainFrame {
    pub position: Option<Vec3>,
    pub rotation: Option<Quat>,
    pub active: Option<bool>,
    pub status: TrainYield,
}

impl TrainFrame {
    fn idle(status: TrainYield) -> Self {
        Self {
            position: None,
            rotation: None,
            active: None,
            status,
        }
    }
}

/// Ссылки на entity маршрута
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct TrainRoute {
    pub train: Entity,
    pub start_point: Entity,
    pub end_point: Entity,
}

#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct TrainLoopMover {
    pub config: TrainLoopConfig,
    pub route: TrainRoute,
    enabled: bool,
    phase: TrainPhase,
}

impl TrainLoopMover {
    pub fn new(config: TrainLoopConfig, route: TrainRoute) -> Self {
        Self {
            config: config.sanitized(),
            route,
            enabled: true,
            phase: TrainPhase::Pending,
        }
    }

    pub fn phase(&self) -> TrainPhase {
        self.phase
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Выключение обрывает цикл сразу, прогресс теряется;
    /// включение стартует с начала (Pending).
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        self.phase = TrainPhase::Pending;
    }

    pub fn tick(&mut self, delta: f32, route: Option<RoutePoses>) -> TrainFrame {
        if !self.enabled {
            return TrainFrame::idle(TrainYield::Done);
        }

        match self.phase {
            TrainPhase::Halted => TrainFrame::idle(TrainYield::Done),
            TrainPhase::Pending => {
                let Some(route) = route else {
                    self.phase = TrainPhase::Halted;
                    return TrainFrame::idle(TrainYield::Done);
                };

                let delay = self.config.initial_delay_secs;
                if delay > 0.0 {
                    self.phase = TrainPhase::Delaying { remaining: delay };
                    return TrainFrame {
                        active: Some(false),
                        ..TrainFrame::idle(TrainYield::Wait(delay))
                    };
                }

                self.start_cycle(delta, route)
            }
            TrainPhase::Delaying { remaining } | TrainPhase::Resting { remaining } => {
                let remaining = remaining - delta;
                if remaining > 0.0 {
                    self.set_waiting(remaining);
                    return TrainFrame::idle(TrainYield::Wait(remaining));
                }

                match route {
                    Some(route) => self.start_cycle(delta, route),
                    None => {
                        self.phase = TrainPhase::Halted;
                        TrainFrame::idle(TrainYield::Done)
                    }
                }
            }
            TrainPhase::Travelling { from, to, t, duration, cycle_elapsed } => {
                self.advance(from, to, t, duration, cycle_elapsed + delta, delta)
            }
        }
    }

    fn set_waiting(&mut self, remaining: f32) {
        self.phase = match self.phase {
            TrainPhase::Delaying { .. } => TrainPhase::Delaying { remaining },
            _ => TrainPhase::Resting { remaining },
        };
    }

    /// Старт цикла: поезд в начало, поворот, показать, первый шаг тем же dt
    fn start_cycle(&mut self, delta: f32, route: RoutePoses) -> TrainFrame {
        let rotation = self.spawn_rotation(&route);

        let distance = route.start.distance(route.end);
        let duration = (distance / self.config.speed.max(TrainLoopConfig::MIN_SPEED))
            .max(TrainLoopConfig::MIN_DURATION);

        let mut frame = self.advance(route.start, route.end, 0.0, duration, 0.0, delta);
        frame.rotation = Some(rotation);
        if frame.active.is_none() {
            frame.active = Some(true);
        }
        frame
    }

    fn spawn_rotation(&self, route: &RoutePoses) -> Quat {
        if self.config.use_fixed_rotation {
            return self.config.fixed_rotation();
        }

        let mut rotation = route.start_rotation;
        if self.config.face_direction {
            let mut direction = route.end - route.start;
            direction.y = 0.0;
            if direction.length_squared() > 0.0001 {
                // +Z поезда смотрит вдоль маршрута
                rotation = Transform::IDENTITY
                    .looking_to(-direction.normalize(), Vec3::Y)
                    .rotation;
            }
        }
        rotation
    }

    fn advance(
        &mut self,
        from: Vec3,
        to: Vec3,
        t: f32,
        duration: f32,
        cycle_elapsed: f32,
        delta: f32,
    ) -> TrainFrame {
        let t = t + delta / duration;

        if t < 1.0 {
            self.phase = TrainPhase::Travelling { from, to, t, duration, cycle_elapsed };
            return TrainFrame {
                position: Some(from.lerp(to, t.clamp(0.0, 1.0))),
                ..TrainFrame::idle(TrainYield::Frame)
            };
        }

        // Доехали: в конец, спрятать, ждать остаток интервала
        let wait = (self.config.interval_secs - cycle_elapsed).max(0.0);
        self.phase = TrainPhase::Resting { remaining: wait };

        TrainFrame {
            position: Some(to),
            rotation: None,
            active: Some(false),
            status: TrainYield::Wait(wait),
        }
    }
}

/// Система: тик всех movers + применение кадра к поезду
pub fn drive_train_loops(
    mut commands: Commands,
    mut movers: Query<&mut TrainLoopMover>,
    mut transforms: Query<&mut Transform>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for mut mover in movers.iter_mut() {
        let route = mover.route;
        let poses = match (
            transforms.get(route.train),
            transforms.get(route.start_point),
            transforms.get(route.end_point),
        ) {
            (Ok(_), Ok(start), Ok(end)) => Some(RoutePoses {
                start: start.translation,
                start_rotation: start.rotation,
                end: end.translation,
            }),
            _ => None,
        };

        let was_halted = mover.phase() == TrainPhase::Halted;
        let frame = mover.tick(delta, poses);

        if !was_halted && mover.phase() == TrainPhase::Halted {
            crate::logger::log_warning(&format!(
                "Train route {:?} is incomplete, mover halted",
                route
            ));
        }

        apply_train_frame(&mut commands, &mut transforms, route.train, &frame);
    }
}

fn apply_train_frame(
    commands: &mut Commands,
    transforms: &mut Query<&mut Transform>,
    train: Entity,
    frame: &TrainFrame,
) {
    if let Ok(mut transform) = transforms.get_mut(train) {
        if let Some(position) = frame.position {
            transform.translation = position;
        }
        if let Some(rotation) = frame.rotation {
            transform.rotation = rotation;
        }
    }

    match frame.active {
        Some(true) => {
            if let Ok(mut entity) = commands.get_entity(train) {
                entity.remove::<Dormant>();
            }
        }
        Some(false) => {
            if let Ok(mut entity) = commands.get_entity(train) {
                entity.insert(Dormant);
            }
        }
        None => {}
    }
}
