//! Combat system module
//!
//! ECS ответственность:
//! - Game state: Health, Attacker (damage, attack rate, last attack time)
//! - Combat rules: DamageSink, death sequence с drop items
//! - Events: ApplyDamage → DamageDealt, EntityDied
//!
//! Движок отвечает только за визуал (attack trigger, damage flash через presentation).

use bevy::prelude::*;

use crate::SimulationSet;

pub mod attacker;
pub mod damage;

// Re-export основных типов
pub use attacker::Attacker;
pub use damage::{
    apply_damage, run_death_sequence, ApplyDamage, DamageDealt, Dead, EntityDied, DROP_HEIGHT,
};

/// Combat Plugin
///
/// Регистрирует combat системы в FixedUpdate (SimulationSet::Combat).
///
/// Порядок выполнения:
/// 1. apply_damage — ApplyDamage → Health (DamageSink) → DamageDealt/EntityDied
/// 2. run_death_sequence — drop items + despawn мёртвых NPC
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<ApplyDamage>()
            .add_event::<DamageDealt>()
            .add_event::<EntityDied>();

        app.add_systems(
            FixedUpdate,
            (damage::apply_damage, damage::run_death_sequence)
                .chain() // Последовательное выполнение
                .in_set(SimulationSet::Combat),
        );
    }
}
