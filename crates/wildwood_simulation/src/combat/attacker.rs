//! Attacker component — боевые характеристики NPC
//!
//! Rate limit атак по времени (не по тикам): атака разрешена если с последней
//! прошло строго больше `attack_rate` секунд.

use bevy::prelude::*;

/// Attacker — компонент для акторов которые могут атаковать
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Attacker {
    /// Урон за удар
    pub damage: i32,

    /// Минимальный интервал между атаками (секунды)
    pub attack_rate: f32,

    /// Время последней состоявшейся атаки (None → ещё не атаковал, готов сразу)
    pub last_attack_time: Option<f32>,
}

impl Default for Attacker {
    fn default() -> Self {
        Self::new(10, 1.0)
    }
}

impl Attacker {
    pub fn new(damage: i32, attack_rate: f32) -> Self {
        Self {
            damage,
            attack_rate,
            last_attack_time: None,
        }
    }

    /// Cooldown прошёл
    pub fn is_ready(&self, now: f32) -> bool {
        match self.last_attack_time {
            None => true,
            Some(last) => now - last > self.attack_rate,
        }
    }

    /// Атаковать если cooldown прошёл: фиксирует время и возвращает урон
    ///
    /// `last_attack_time` только растёт.
    pub fn try_attack(&mut self, now: f32) -> Option<i32> {
        if !self.is_ready(now) {
            return None;
        }

        self.last_attack_time = Some(self.last_attack_time.map_or(now, |last| last.max(now)));
        Some(self.damage)
    }
}
