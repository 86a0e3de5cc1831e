//! Presentation module — визуальный/звуковой intent симуляции
//!
//! Симуляция НЕ рисует и НЕ играет звуки. Она пишет intent в компоненты/события:
//! - AnimationState (moving flag + animation rate) — пишет AI controller
//! - AnimationTriggered (one-shot триггеры, например Attack)
//! - SurfaceTint (damage flash)
//! - FootstepPlayed (шаги)
//!
//! `sync_presentation` пробрасывает изменения в `PresentationSink` (движок / лог / тест).

use bevy::prelude::*;

use crate::SimulationSet;

pub mod footsteps;
pub mod sync;

pub use footsteps::{emit_footsteps, FootstepPlayed, Footsteps, GROUNDED_VERTICAL_SPEED};
pub use sync::{sync_presentation, LogPresentationSink, Presentation, PresentationSink};

/// Длительность damage flash (секунды)
pub const DAMAGE_FLASH_DURATION: f32 = 0.1;

// ============================================================================
// Animation
// ============================================================================

/// Состояние анимации актора (пишет AI, читает presentation)
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct AnimationState {
    /// Locomotion анимация (state != Idle)
    pub moving: bool,
    /// Скорость проигрывания (текущая скорость / walk speed)
    pub speed_scale: f32,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self {
            moving: false,
            speed_scale: 1.0,
        }
    }
}

/// One-shot анимационные триггеры
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum AnimationTrigger {
    Attack,
}

impl AnimationTrigger {
    pub fn name(&self) -> &'static str {
        match self {
            AnimationTrigger::Attack => "Attack",
        }
    }
}

/// Событие: проиграть one-shot анимацию
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct AnimationTriggered {
    pub entity: Entity,
    pub trigger: AnimationTrigger,
}

// ============================================================================
// Damage flash
// ============================================================================

/// Цвет поверхности (multiply tint, linear RGB)
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct SurfaceColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl SurfaceColor {
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const DAMAGE_FLASH: Self = Self::rgb(1.0, 0.6, 0.6);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

/// Tint всех mesh renderers актора
///
/// Flash: DAMAGE_FLASH на DAMAGE_FLASH_DURATION, затем WHITE.
/// Повторный удар во время flash продлевает его.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct SurfaceTint {
    pub color: SurfaceColor,
    /// Когда вернуть WHITE (None → flash не активен)
    pub flash_until: Option<f32>,
}

impl Default for SurfaceTint {
    fn default() -> Self {
        Self {
            color: SurfaceColor::WHITE,
            flash_until: None,
        }
    }
}

impl SurfaceTint {
    pub fn start_flash(&mut self, now: f32) {
        self.color = SurfaceColor::DAMAGE_FLASH;
        self.flash_until = Some(now + DAMAGE_FLASH_DURATION);
    }

    /// Вернуть WHITE если flash истёк; true → цвет изменился
    pub fn expire(&mut self, now: f32) -> bool {
        match self.flash_until {
            Some(until) if now >= until => {
                self.color = SurfaceColor::WHITE;
                self.flash_until = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_flashing(&self) -> bool {
        self.flash_until.is_some()
    }
}

/// Система: вернуть цвет после damage flash
pub fn tick_damage_flash(mut tints: Query<&mut SurfaceTint>, time: Res<Time<Fixed>>) {
    let now = time.elapsed_secs();

    for mut tint in tints.iter_mut() {
        // Мутируем только истёкшие — Changed<SurfaceTint> не срабатывает зря
        if tint.flash_until.is_some_and(|until| now >= until) {
            tint.expire(now);
        }
    }
}

/// Presentation Plugin
///
/// Порядок (SimulationSet::Presentation):
/// 1. tick_damage_flash
/// 2. emit_footsteps
/// 3. sync_presentation → PresentationSink
pub struct PresentationPlugin;

impl Plugin for PresentationPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<AnimationTriggered>()
            .add_event::<FootstepPlayed>()
            .init_resource::<Presentation>();

        app.add_systems(
            FixedUpdate,
            (tick_damage_flash, footsteps::emit_footsteps, sync::sync_presentation)
                .chain()
                .in_set(SimulationSet::Presentation),
        );
    }
}
