//! NPC archetypes: per-species tunables из RON + спавн NPC
//!
//! RON формат: один `NpcArchetype`, см. `assets/archetypes/wolf.ron`.
//! Пропущенные поля `ai` берутся из `AIConfig::default()`.

use std::path::{Path, PathBuf};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ai::{AIConfig, PursuitTarget};
use crate::combat::Attacker;
use crate::components::{Health, Npc};
use crate::item_system::{DropTable, ItemSpec};

/// Встроенный архетип (волк), используется headless runner'ом по умолчанию
pub const DEFAULT_ARCHETYPE_RON: &str = include_str!("../assets/archetypes/wolf.ron");

/// Ошибки загрузки конфигурации (единственный fallible API крейта)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read archetype file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse archetype RON: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("invalid archetype field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Архетип NPC (вид животного / монстра)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcArchetype {
    pub name: String,
    pub health: i32,
    #[serde(default)]
    pub ai: AIConfig,
    pub damage: i32,
    /// Минимальный интервал между атаками (секунды)
    pub attack_rate: f32,
    #[serde(default)]
    pub drops: Vec<ItemSpec>,
}

impl NpcArchetype {
    /// Parse + validate
    pub fn from_ron_str(content: &str) -> Result<Self, ConfigError> {
        let archetype: NpcArchetype = ron::from_str(content)?;
        archetype.validate()?;
        Ok(archetype)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let archetype = Self::from_ron_str(&content)?;
        crate::log_info(&format!("Archetype '{}' loaded from {:?}", archetype.name, path));
        Ok(archetype)
    }

    /// Встроенный архетип
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_ron_str(DEFAULT_ARCHETYPE_RON)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let ai = &self.ai;

        if self.health <= 0 {
            return Err(invalid("health", format!("must be positive, got {}", self.health)));
        }
        if self.damage < 0 {
            return Err(invalid("damage", format!("must be non-negative, got {}", self.damage)));
        }

        for (field, value) in [
            ("attack_rate", self.attack_rate),
            ("ai.walk_speed", ai.walk_speed),
            ("ai.run_speed", ai.run_speed),
            ("ai.detect_distance", ai.detect_distance),
            ("ai.attack_distance", ai.attack_distance),
            ("ai.field_of_view", ai.field_of_view),
            ("ai.min_wander_distance", ai.min_wander_distance),
            ("ai.max_wander_distance", ai.max_wander_distance),
            ("ai.min_wander_wait_time", ai.min_wander_wait_time),
            ("ai.max_wander_wait_time", ai.max_wander_wait_time),
        ] {
            // inf/NaN ломают gen_range при сэмплинге wander
            if !value.is_finite() {
                return Err(invalid(field, format!("must be finite, got {}", value)));
            }
        }

        if !(self.attack_rate >= 0.0) {
            return Err(invalid("attack_rate", format!("must be non-negative, got {}", self.attack_rate)));
        }
        if !(ai.walk_speed > 0.0) {
            // animation rate = speed / walk_speed
            return Err(invalid("ai.walk_speed", format!("must be positive, got {}", ai.walk_speed)));
        }

        for (field, value) in [
            ("ai.run_speed", ai.run_speed),
            ("ai.detect_distance", ai.detect_distance),
            ("ai.attack_distance", ai.attack_distance),
            ("ai.min_wander_distance", ai.min_wander_distance),
            ("ai.min_wander_wait_time", ai.min_wander_wait_time),
        ] {
            if !(value >= 0.0) {
                return Err(invalid(field, format!("must be non-negative, got {}", value)));
            }
        }

        if !(ai.field_of_view > 0.0 && ai.field_of_view <= 360.0) {
            return Err(invalid(
                "ai.field_of_view",
                format!("must be in (0, 360], got {}", ai.field_of_view),
            ));
        }
        if ai.min_wander_distance > ai.max_wander_distance {
            return Err(invalid(
                "ai.max_wander_distance",
                format!("{} < min {}", ai.max_wander_distance, ai.min_wander_distance),
            ));
        }
        if ai.min_wander_wait_time > ai.max_wander_wait_time {
            return Err(invalid(
                "ai.max_wander_wait_time",
                format!("{} < min {}", ai.max_wander_wait_time, ai.min_wander_wait_time),
            ));
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

/// Заспавнить NPC по архетипу
///
/// Остальное (AIState, NavAgent, AnimationState, SurfaceTint...) добавляется
/// через Required Components маркера `Npc`. Начальный Wandering ставит
/// `initialize_spawned_npcs` на первом FixedUpdate тике.
pub fn spawn_npc(
    commands: &mut Commands,
    archetype: &NpcArchetype,
    position: Vec3,
    target: Option<Entity>,
) -> Entity {
    let mut npc = commands.spawn((
        Npc,
        Name::new(archetype.name.clone()),
        Transform::from_translation(position),
        Health::new(archetype.health),
        archetype.ai.clone(),
        Attacker::new(archetype.damage, archetype.attack_rate),
        DropTable {
            items: archetype.drops.clone(),
        },
    ));

    if let Some(target) = target {
        npc.insert(PursuitTarget(target));
    }

    let entity = npc.id();
    crate::log(&format!("NPC '{}' spawned: {:?} at {:?}", archetype.name, entity, position));
    entity
}
