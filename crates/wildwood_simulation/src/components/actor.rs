//! Базовые компоненты акторов: Health, DamageSink, Player/Npc markers

use bevy::prelude::*;

use crate::ai::{AIConfig, AIState, ScheduledWander};
use crate::combat::Attacker;
use crate::item_system::DropTable;
use crate::navigation::NavAgent;
use crate::presentation::{AnimationState, SurfaceTint};

/// Враждебный NPC под управлением behavior controller
///
/// Автоматически добавляет state machine, навигацию и presentation через Required Components.
/// AIConfig и Attacker по умолчанию, PursuitTarget задаётся при спавне (см. `config::spawn_npc`).
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(
    Health,
    AIConfig,
    AIState,
    Attacker,
    ScheduledWander,
    NavAgent,
    AnimationState,
    SurfaceTint,
    DropTable
)]
pub struct Npc;

/// Marker: entity которым управляет игрок (единственная цель преследования)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(Health)]
pub struct Player;

/// Здоровье актора
///
/// `current` может уйти в минус (5 HP - 10 damage = -5), смерть при `current <= 0`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: i32,
    pub max: i32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Health {
    pub fn new(max: i32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }
}

/// Результат применения урона
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Урон принят, актор жив
    Survived,
    /// Этот удар перевёл актора через границу смерти (ровно один раз)
    Killed,
    /// Актор уже был мёртв — урон проигнорирован
    AlreadyDead,
}

/// Capability: всё что может получать урон (игрок, NPC, разрушаемые объекты)
pub trait DamageSink {
    fn apply_damage(&mut self, amount: i32) -> DamageOutcome;
}

impl DamageSink for Health {
    fn apply_damage(&mut self, amount: i32) -> DamageOutcome {
        if !self.is_alive() {
            return DamageOutcome::AlreadyDead;
        }

        self.current = self.current.saturating_sub(amount);

        if self.is_alive() {
            DamageOutcome::Survived
        } else {
            DamageOutcome::Killed
        }
    }
}
