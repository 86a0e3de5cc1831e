//! Wildwood Simulation Core
//!
//! ECS-симуляция NPC для survival игры на Bevy 0.16 (headless).
//!
//! Симуляция владеет game state (AI state machine, health, combat timing, drops),
//! движок получает только intent через контракты:
//! - NavigationService — navmesh (sample / path)
//! - PresentationSink — animator, renderers, audio
//!
//! Всё gameplay работает в FixedUpdate (60Hz) в порядке `SimulationSet`.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod components;
pub mod config;
pub mod item_system;
pub mod logger;
pub mod navigation;
pub mod presentation;

// Re-export базовых компонентов для удобства
pub use ai::{AIConfig, AIPlugin, AIState, PursuitTarget, ScheduledWander};
pub use combat::{ApplyDamage, Attacker, CombatPlugin, DamageDealt, Dead, EntityDied};
pub use components::*;
pub use config::{spawn_npc, ConfigError, NpcArchetype};
pub use item_system::{DropTable, DroppedItem, GatherHit, ItemPlugin, ItemSpec, ResourceNode};
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, log_with_level, set_log_level, set_logger,
    ConsoleLogger, LogLevel, LogPrinter,
};
pub use navigation::{FlatNavMesh, NavAgent, NavMesh, NavigationPlugin, NavigationService};
pub use presentation::{
    AnimationState, Footsteps, Presentation, PresentationPlugin, PresentationSink, SurfaceTint,
};

/// Частота simulation tick (FixedUpdate)
pub const TICK_RATE_HZ: f64 = 60.0;

/// Длительность одного simulation tick
pub fn fixed_timestep() -> Duration {
    Duration::from_secs_f64(1.0 / TICK_RATE_HZ)
}

/// Порядок simulation систем внутри одного FixedUpdate тика
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Спавн-инициализация + созревшие таймеры (scheduled wander)
    Timers,
    /// Perception + state machine
    Behavior,
    /// Движение NavAgent по пути
    Locomotion,
    /// Урон, смерть, drops, сбор ресурсов
    Combat,
    /// Damage flash, шаги, sync → PresentationSink
    Presentation,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            FixedUpdate,
            (
                SimulationSet::Timers,
                SimulationSet::Behavior,
                SimulationSet::Locomotion,
                SimulationSet::Combat,
                SimulationSet::Presentation,
            )
                .chain(),
        );

        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(TICK_RATE_HZ))
            // Детерминистичный RNG (seed по умолчанию, если приложение не задало свой)
            .init_resource::<DeterministicRng>()
            .register_type::<Npc>()
            .register_type::<Player>()
            .register_type::<Health>()
            .register_type::<AIState>()
            .register_type::<AIConfig>()
            .register_type::<Attacker>()
            .register_type::<NavAgent>()
            .register_type::<DropTable>()
            .register_type::<SurfaceTint>()
            // Подсистемы
            .add_plugins((
                NavigationPlugin,
                AIPlugin,
                CombatPlugin,
                ItemPlugin,
                PresentationPlugin,
            ));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время ручное: каждый `app.update()` = ровно один fixed tick
/// (кроме самого первого update, он только стартует часы).
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(TICK_RATE_HZ))
        .insert_resource(TimeUpdateStrategy::ManualDuration(fixed_timestep()));

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
