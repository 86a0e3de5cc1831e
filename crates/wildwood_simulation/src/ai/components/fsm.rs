//! FSM AI components (state machine, config, pursuit target, scheduled wander).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// AI FSM состояния
///
/// Ровно одно активно. Меняется ТОЛЬКО через `set_state`
/// (он же синхронизирует скорость NavAgent и animation rate).
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub enum AIState {
    /// Idle — стоим на месте, ждём scheduled wander
    Idle,

    /// Wandering — идём к случайной точке на navmesh (начальное состояние)
    Wandering,

    /// Attacking — преследуем и атакуем цель (run speed)
    Attacking,
}

impl Default for AIState {
    fn default() -> Self {
        Self::Wandering
    }
}

impl AIState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AIState::Idle => "Idle",
            AIState::Wandering => "Wandering",
            AIState::Attacking => "Attacking",
        }
    }
}

/// Параметры поведения NPC (designer-configured, неизменны в runtime)
#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct AIConfig {
    /// Скорость ходьбы (Idle/Wandering), м/с
    pub walk_speed: f32,
    /// Скорость бега (Attacking), м/с
    pub run_speed: f32,
    /// Радиус обнаружения цели (всенаправленный), метры
    pub detect_distance: f32,
    /// Дистанция атаки, метры
    pub attack_distance: f32,
    /// Угол обзора (градусы, полный конус) — гейтит только атаку
    pub field_of_view: f32,
    pub min_wander_distance: f32,
    pub max_wander_distance: f32,
    /// Пауза между wander точками (секунды)
    pub min_wander_wait_time: f32,
    pub max_wander_wait_time: f32,
}

impl Default for AIConfig {
    fn default() -> Self {
        Self {
            walk_speed: 2.0,
            run_speed: 5.0,
            detect_distance: 10.0,
            attack_distance: 2.0,
            field_of_view: 120.0,
            min_wander_distance: 10.0,
            max_wander_distance: 20.0,
            min_wander_wait_time: 3.0,
            max_wander_wait_time: 6.0,
        }
    }
}

impl AIConfig {
    /// Скорость для состояния: walk для Idle/Wandering, run для Attacking
    pub fn speed_for(&self, state: AIState) -> f32 {
        match state {
            AIState::Idle | AIState::Wandering => self.walk_speed,
            AIState::Attacking => self.run_speed,
        }
    }

    /// Animation rate пропорционален скорости относительно ходьбы
    pub fn animation_rate_for(&self, speed: f32) -> f32 {
        if self.walk_speed > 0.0 {
            speed / self.walk_speed
        } else {
            1.0
        }
    }
}

/// Цель преследования (игрок), инжектится при спавне
///
/// Заменяет глобальный lookup "the player": каждый NPC знает свою цель явно.
/// Позиция берётся из Transform цели, урон — через её Health (DamageSink).
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct PursuitTarget(pub Entity);

/// Отложенный возврат к wandering (one-shot timer entry)
///
/// Ставится при переходе Wandering → Idle. Когда срабатывает — переводит
/// в Wandering ТОЛЬКО если NPC всё ещё Idle (обнаружение цели могло прервать ожидание).
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct ScheduledWander {
    /// Время срабатывания (Time<Fixed>::elapsed_secs), None = ничего не запланировано
    pub resume_at: Option<f32>,
}

impl ScheduledWander {
    pub fn schedule(&mut self, now: f32, delay: f32) {
        self.resume_at = Some(now + delay);
    }

    /// Забирает timer entry если он созрел (one-shot)
    pub fn take_due(&mut self, now: f32) -> bool {
        match self.resume_at {
            Some(at) if now >= at => {
                self.resume_at = None;
                true
            }
            _ => false,
        }
    }
}
