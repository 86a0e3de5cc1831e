//! AI decision-making module
//!
//! Простой FSM для враждебных NPC: Wandering ⇄ Idle, → Attacking при обнаружении цели.
//!
//! Внешние зависимости контроллера (только через контракты):
//! - NavigationService (navigation module) — sample/path/remaining distance
//! - PursuitTarget → Transform + Health цели (DamageSink)
//! - AnimationState / AnimationTriggered (presentation module)

use bevy::prelude::*;

use crate::combat::ApplyDamage;
use crate::navigation::NavMesh;
use crate::presentation::AnimationTriggered;
use crate::{DeterministicRng, SimulationSet};

pub mod components;
pub mod perception;
pub mod systems;

// Re-export основных типов
pub use components::{AIConfig, AIState, PursuitTarget, ScheduledWander};
pub use perception::{is_in_field_of_view, Perception};
pub use systems::{sample_wander_destination, WanderSample, ARRIVAL_THRESHOLD, MAX_WANDER_RESAMPLES};

/// AI Plugin
///
/// Регистрирует AI системы в FixedUpdate для детерминизма.
/// Порядок выполнения:
/// 1. initialize_spawned_npcs — новые NPC входят в Wandering (SimulationSet::Timers)
/// 2. fire_scheduled_wander — созревшие таймеры возврата к wandering (SimulationSet::Timers)
/// 3. npc_behavior_tick — perception + FSM dispatch (SimulationSet::Behavior)
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        // Behavior tick пишет эти события — регистрируем даже без CombatPlugin/PresentationPlugin
        app.add_event::<ApplyDamage>()
            .add_event::<AnimationTriggered>()
            .init_resource::<DeterministicRng>()
            .init_resource::<NavMesh>();

        app.add_systems(
            FixedUpdate,
            (
                (systems::initialize_spawned_npcs, systems::fire_scheduled_wander)
                    .chain()
                    .in_set(SimulationSet::Timers),
                systems::npc_behavior_tick.in_set(SimulationSet::Behavior),
            ),
        );
    }
}
