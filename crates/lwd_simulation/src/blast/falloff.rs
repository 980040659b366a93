//! Геометрия взрыва: контакт с коллайдером и линейный falloff

use bevy::prelude::*;
use crate::components::ColliderProxy;

/// Порог "нулевого" расстояния / урона
pub const BLAST_EPSILON: f32 = f32::EPSILON;

/// Линейный falloff: 1 в центре, 0 на краю радиуса
///
/// `None` если `distance >= radius` (граница открытая).
pub fn falloff_fraction(distance: f32, radius: f32) -> Option<f32> {
    if distance >= radius {
        return None;
    }
    Some(1.0 - distance / radius)
}

/// Контакт взрыва с одним коллайдером
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlastContact {
    /// Ближайшая к центру точка коллайдера
    pub point: Vec3,
    /// Направление от точки к центру взрыва
    pub normal: Vec3,
    pub distance: f32,
    pub fraction: f32,
}

/// Считает контакт центра взрыва с коллайдером
///
/// - closest point: convex меш — точка поверхности, остальное — origin
/// - нормаль вырождается, когда точка совпадает с центром: тогда берём
///   направление origin → closest (или ноль, если и оно вырождено)
pub fn blast_contact(
    center: Vec3,
    radius: f32,
    collider: &ColliderProxy,
    transform: &Transform,
) -> Option<BlastContact> {
    let point = collider.closest_point(transform, center);
    let displacement = center - point;
    let distance = displacement.length();

    let fraction = falloff_fraction(distance, radius)?;

    let normal = if distance > BLAST_EPSILON {
        displacement / distance
    } else {
        (point - transform.translation).normalize_or_zero()
    };

    Some(BlastContact {
        point,
        normal,
        distance,
        fraction,
    })
}

/// Импульс взрыва для rigid body
///
/// Центр импульса смещён вниз на `upwards_modifier`, величина масштабируется falloff'ом.
pub fn explosion_impulse(
    center: Vec3,
    body_origin: Vec3,
    force: f32,
    upwards_modifier: f32,
    fraction: f32,
) -> Vec3 {
    let origin = center - Vec3::Y * upwards_modifier;
    let direction = (body_origin - origin).normalize_or(Vec3::Y);
    direction * force * fraction
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction_endpoints() {
        assert_eq!(falloff_fraction(0.0, 4.5), Some(1.0));
        assert_eq!(falloff_fraction(2.25, 4.5), Some(0.5));
        assert_eq!(falloff_fraction(4.5, 4.5), None);
        assert_eq!(falloff_fraction(10.0, 4.5), None);
    }

    #[test]
    fn test_fraction_monotonic_decreasing() {
        let radius = 4.5;
        let mut previous = f32::INFINITY;

        for step in 0..45 {
            let distance = step as f32 * 0.1;
            let fraction = falloff_fraction(distance, radius).unwrap();
            assert!(fraction < previous, "distance {} fraction {}", distance, fraction);
            assert!(fraction > 0.0 && fraction <= 1.0);
            previous = fraction;
        }
    }

    #[test]
    fn test_contact_at_half_radius() {
        let transform = Transform::from_xyz(2.25, 0.0, 0.0);
        let contact =
            blast_contact(Vec3::ZERO, 4.5, &ColliderProxy::sphere(0.5), &transform).unwrap();

        assert_eq!(contact.point, Vec3::new(2.25, 0.0, 0.0));
        assert!((contact.fraction - 0.5).abs() < 1e-6);
        assert!((contact.normal - Vec3::NEG_X).length() < 1e-6);
    }

    #[test]
    fn test_contact_exactly_at_radius_excluded() {
        let transform = Transform::from_xyz(0.0, 0.0, 4.5);
        assert!(blast_contact(Vec3::ZERO, 4.5, &ColliderProxy::sphere(1.0), &transform).is_none());
    }

    #[test]
    fn test_convex_mesh_uses_surface_point() {
        // Origin за радиусом, но поверхность внутри
        let transform = Transform::from_xyz(5.0, 0.0, 0.0);
        let collider = ColliderProxy::mesh(Vec3::splat(1.0), true);

        let contact = blast_contact(Vec3::ZERO, 4.5, &collider, &transform).unwrap();
        assert!((contact.distance - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_degenerate_normal_falls_back_to_origin_direction() {
        // Центр взрыва внутри convex меша: closest point == center
        let transform = Transform::from_xyz(0.0, -0.5, 0.0);
        let collider = ColliderProxy::mesh(Vec3::ONE, true);

        let contact = blast_contact(Vec3::ZERO, 4.5, &collider, &transform).unwrap();
        assert_eq!(contact.distance, 0.0);
        assert_eq!(contact.fraction, 1.0);
        assert!((contact.normal - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_fully_degenerate_normal_is_zero() {
        let transform = Transform::IDENTITY;
        let contact =
            blast_contact(Vec3::ZERO, 4.5, &ColliderProxy::sphere(1.0), &transform).unwrap();
        assert_eq!(contact.normal, Vec3::ZERO);
    }

    #[test]
    fn test_explosion_impulse_direction_and_scale() {
        let impulse = explosion_impulse(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), 800.0, 0.0, 0.5);
        assert!((impulse - Vec3::new(400.0, 0.0, 0.0)).length() < 1e-3);
    }

    #[test]
    fn test_upwards_modifier_lifts_bodies() {
        let impulse = explosion_impulse(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), 800.0, 2.0, 1.0);
        assert!(impulse.y > 0.0);
        assert!((impulse.length() - 800.0).abs() < 1e-2);
    }

    #[test]
    fn test_impulse_on_center_points_up() {
        let impulse = explosion_impulse(Vec3::ZERO, Vec3::ZERO, 100.0, 0.0, 1.0);
        assert_eq!(impulse, Vec3::new(0.0, 100.0, 0.0));
    }
}
