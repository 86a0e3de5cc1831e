//! Item System — предметы в мире: drop tables NPC и ресурсные узлы
//!
//! # Архитектура
//!
//! **ItemSpec** — статический blueprint предмета (id + display name), из RON архетипов.
//!
//! **DroppedItem** — предмет лежащий в мире (entity с Transform).
//! После спавна владелец — мир (NPC может быть уже despawned).
//!
//! **ResourceNode** — дерево/камень: каждый GatherHit выдаёт `quantity_per_hit`
//! предметов пока не кончится `capacity`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::SimulationSet;

/// Высота спавна собранных ресурсов над точкой удара (метры)
pub const GATHER_SPAWN_OFFSET: f32 = 1.0;

// ============================================================================
// ItemId / ItemSpec
// ============================================================================

/// Item identifier (unique string ID)
///
/// # Examples
/// - "raw_meat"
/// - "wolf_pelt"
/// - "wood_log"
#[derive(Clone, Debug, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Blueprint предмета
#[derive(Clone, Debug, PartialEq, Reflect, Serialize, Deserialize)]
pub struct ItemSpec {
    pub id: ItemId,
    pub display_name: String,
}

impl ItemSpec {
    pub fn new(id: impl Into<ItemId>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

// ============================================================================
// Components
// ============================================================================

/// Что выпадает из NPC при смерти (по одному экземпляру каждого)
#[derive(Component, Clone, Debug, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct DropTable {
    pub items: Vec<ItemSpec>,
}

/// Предмет лежащий в мире
#[derive(Component, Clone, Debug, PartialEq, Reflect)]
#[reflect(Component)]
pub struct DroppedItem {
    pub spec: ItemSpec,
}

/// Ресурсный узел (дерево, камень, куст)
#[derive(Component, Clone, Debug, PartialEq, Reflect)]
#[reflect(Component)]
pub struct ResourceNode {
    pub item: ItemSpec,
    /// Предметов за один удар
    pub quantity_per_hit: u32,
    /// Сколько предметов осталось в узле
    pub capacity: u32,
}

impl ResourceNode {
    pub fn new(item: ItemSpec, quantity_per_hit: u32, capacity: u32) -> Self {
        Self {
            item,
            quantity_per_hit,
            capacity,
        }
    }

    /// Забрать предметы за один удар; возвращает сколько выдано (≤ quantity_per_hit, ≤ capacity)
    pub fn gather(&mut self) -> u32 {
        let taken = self.quantity_per_hit.min(self.capacity);
        self.capacity -= taken;
        taken
    }

    pub fn is_depleted(&self) -> bool {
        self.capacity == 0
    }
}

// ============================================================================
// Events
// ============================================================================

/// Событие: удар по ресурсному узлу (от игрока / инструмента)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct GatherHit {
    pub node: Entity,
    pub hit_point: Vec3,
    pub hit_normal: Vec3,
}

// ============================================================================
// Spawning
// ============================================================================

/// Заспавнить предмет в мире
///
/// Ownership сразу у мира: entity не привязан к тому, кто его уронил.
pub fn spawn_item(commands: &mut Commands, spec: ItemSpec, position: Vec3, rotation: Quat) -> Entity {
    crate::log(&format!("Item spawned: {} at {:?}", spec.id.0, position));

    commands
        .spawn((
            Name::new(spec.display_name.clone()),
            DroppedItem { spec },
            Transform::from_translation(position).with_rotation(rotation),
        ))
        .id()
}

/// Система: обработка GatherHit → спавн ресурсов над точкой удара
///
/// Предметы смотрят вдоль нормали поверхности в точке удара.
pub fn gather_resources(
    mut commands: Commands,
    mut hits: EventReader<GatherHit>,
    mut nodes: Query<&mut ResourceNode>,
) {
    for hit in hits.read() {
        let Ok(mut node) = nodes.get_mut(hit.node) else {
            crate::log_warning(&format!("GatherHit: {:?} is not a ResourceNode", hit.node));
            continue;
        };

        let count = node.gather();
        if count == 0 {
            continue;
        }

        let position = hit.hit_point + Vec3::Y * GATHER_SPAWN_OFFSET;
        let rotation = Transform::IDENTITY.looking_to(hit.hit_normal, Vec3::Y).rotation;

        for _ in 0..count {
            spawn_item(&mut commands, node.item.clone(), position, rotation);
        }

        if node.is_depleted() {
            crate::log(&format!("ResourceNode {:?} depleted", hit.node));
        }
    }
}

/// Item Plugin
pub struct ItemPlugin;

impl Plugin for ItemPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<GatherHit>().add_systems(
            FixedUpdate,
            gather_resources.in_set(SimulationSet::Combat),
        );
    }
}
