//! Perception: пространственное отношение NPC к цели на текущем тике
//!
//! Чистое чтение мира, без side effects.
//! - Обнаружение всенаправленное (distance < detect_distance)
//! - Field of view гейтит ТОЛЬКО атаку

use bevy::prelude::*;

/// Снимок восприятия цели на один тик
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perception {
    /// Прямая дистанция до цели (INFINITY если цели нет)
    pub distance: f32,
    /// Цель внутри конуса обзора
    pub in_field_of_view: bool,
    /// Текущая позиция цели (для пересчёта пути)
    pub target_position: Option<Vec3>,
}

impl Perception {
    /// Цель потеряна (despawned / мертва) — ведём себя как будто она за пределами detect_distance
    pub const LOST: Self = Self {
        distance: f32::INFINITY,
        in_field_of_view: false,
        target_position: None,
    };

    pub fn observe(transform: &Transform, target_position: Vec3, field_of_view: f32) -> Self {
        Self {
            distance: transform.translation.distance(target_position),
            in_field_of_view: is_in_field_of_view(
                transform.translation,
                *transform.forward(),
                target_position,
                field_of_view,
            ),
            target_position: Some(target_position),
        }
    }
}

/// Угол между forward и направлением на цель меньше половины field_of_view (градусы)
///
/// Нулевой вектор до цели считается углом 0 (цель "в упор" всегда видна).
pub fn is_in_field_of_view(position: Vec3, forward: Vec3, target: Vec3, field_of_view: f32) -> bool {
    let to_target = target - position;
    if to_target.length_squared() < 1e-10 || forward.length_squared() < 1e-10 {
        return 0.0 < field_of_view * 0.5;
    }

    let angle = forward.angle_between(to_target).to_degrees();
    angle < field_of_view * 0.5
}
