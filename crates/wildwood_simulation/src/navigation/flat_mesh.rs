//! FlatNavMesh — прямоугольная горизонтальная площадка (headless navmesh)
//!
//! Пути прямые (площадка выпуклая, препятствий нет).
//! Точки за пределами прямоугольника или далеко по вертикали недостижимы.

use bevy::prelude::*;

use super::{NavPath, NavigationService};

/// Допустимое отклонение по вертикали при snap точки к плоскости (метры)
pub const MAX_VERTICAL_SNAP: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct FlatNavMesh {
    /// Минимальный угол (x, z)
    pub min: Vec2,
    /// Максимальный угол (x, z)
    pub max: Vec2,
    /// Высота плоскости (y)
    pub height: f32,
}

impl Default for FlatNavMesh {
    fn default() -> Self {
        Self::new(Vec2::splat(-100.0), Vec2::splat(100.0), 0.0)
    }
}

impl FlatNavMesh {
    pub fn new(min: Vec2, max: Vec2, height: f32) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
            height,
        }
    }

    /// Точка лежит на площадке (с допуском по вертикали)
    pub fn contains(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.z >= self.min.y
            && point.z <= self.max.y
            && (point.y - self.height).abs() <= MAX_VERTICAL_SNAP
    }

    fn snap(&self, point: Vec3) -> Vec3 {
        Vec3::new(
            point.x.clamp(self.min.x, self.max.x),
            self.height,
            point.z.clamp(self.min.y, self.max.y),
        )
    }
}

impl NavigationService for FlatNavMesh {
    fn sample_walkable(&self, origin: Vec3, max_distance: f32) -> Option<Vec3> {
        let snapped = self.snap(origin);
        (snapped.distance(origin) <= max_distance).then_some(snapped)
    }

    fn compute_path(&self, from: Vec3, to: Vec3) -> Option<NavPath> {
        if !self.contains(from) || !self.contains(to) {
            return None;
        }

        Some(NavPath::new(vec![self.snap(to)]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_snaps_to_plane() {
        let mesh = FlatNavMesh::default();
        let hit = mesh.sample_walkable(Vec3::new(3.0, 5.0, -4.0), 10.0);
        assert_eq!(hit, Some(Vec3::new(3.0, 0.0, -4.0)));
    }

    #[test]
    fn test_sample_clamps_to_bounds() {
        let mesh = FlatNavMesh::new(Vec2::splat(-10.0), Vec2::splat(10.0), 0.0);
        let hit = mesh.sample_walkable(Vec3::new(12.0, 0.0, 0.0), 5.0);
        assert_eq!(hit, Some(Vec3::new(10.0, 0.0, 0.0)));
    }

    #[test]
    fn test_sample_fails_outside_search_radius() {
        let mesh = FlatNavMesh::new(Vec2::splat(-10.0), Vec2::splat(10.0), 0.0);
        assert_eq!(mesh.sample_walkable(Vec3::new(30.0, 0.0, 0.0), 5.0), None);
    }

    #[test]
    fn test_path_inside_bounds_is_straight() {
        let mesh = FlatNavMesh::default();
        let path = mesh
            .compute_path(Vec3::ZERO, Vec3::new(5.0, 0.0, 5.0))
            .expect("path inside bounds");
        assert_eq!(path.corners, vec![Vec3::new(5.0, 0.0, 5.0)]);
    }

    #[test]
    fn test_path_to_outside_fails() {
        let mesh = FlatNavMesh::new(Vec2::splat(-10.0), Vec2::splat(10.0), 0.0);
        assert!(mesh.compute_path(Vec3::ZERO, Vec3::new(15.0, 0.0, 0.0)).is_none());
        // Цель высоко над площадкой
        assert!(mesh.compute_path(Vec3::ZERO, Vec3::new(1.0, 8.0, 0.0)).is_none());
    }
}
