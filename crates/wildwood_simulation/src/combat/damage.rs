//! Damage система
//!
//! ApplyDamage (запрос) → DamageSink::apply_damage(Health) → DamageDealt / EntityDied.
//! Смерть NPC: drop items над позицией → despawn (ровно один раз).
//! Любой урон запускает damage flash (SurfaceTint), даже смертельный.

use bevy::prelude::*;

use crate::components::{DamageOutcome, DamageSink, Health, Npc};
use crate::item_system::{spawn_item, DropTable};
use crate::presentation::SurfaceTint;

/// Высота спавна drop items над NPC (метры)
pub const DROP_HEIGHT: f32 = 2.0;

/// Событие-запрос: нанести урон entity с DamageSink (Health)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ApplyDamage {
    /// Кто бьёт (None — окружение / скрипт)
    pub source: Option<Entity>,
    pub target: Entity,
    pub amount: i32,
}

/// Событие: урон нанесен
///
/// Генерируется после применения damage к Health.
/// Используется для UI, звуков, эффектов.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DamageDealt {
    pub source: Option<Entity>,
    pub target: Entity,
    pub amount: i32,
    /// Health после удара (может быть отрицательным)
    pub remaining_health: i32,
    pub target_died: bool,
}

/// Событие: entity умер (health перешёл через 0)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Компонент-маркер: entity мертв
///
/// NPC с этим маркером не обрабатываются AI (и despawn'ятся death sequence).
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Dead;

/// Система: apply damage от ApplyDamage событий
///
/// 1. Применяем урон через DamageSink
/// 2. Запускаем damage flash (если у entity есть SurfaceTint)
/// 3. Генерируем DamageDealt и (один раз) EntityDied + маркер Dead
pub fn apply_damage(
    mut commands: Commands,
    mut requests: EventReader<ApplyDamage>,
    mut targets: Query<(&mut Health, Option<&mut SurfaceTint>)>,
    mut damage_dealt_events: EventWriter<DamageDealt>,
    mut entity_died_events: EventWriter<EntityDied>,
    time: Res<Time<Fixed>>,
) {
    let now = time.elapsed_secs();

    for request in requests.read() {
        let Ok((mut health, tint)) = targets.get_mut(request.target) else {
            crate::log_warning(&format!(
                "ApplyDamage: target {:?} has no Health (despawned?)",
                request.target
            ));
            continue;
        };

        let outcome = health.apply_damage(request.amount);
        if outcome == DamageOutcome::AlreadyDead {
            continue;
        }

        if let Some(mut tint) = tint {
            tint.start_flash(now);
        }

        let died = outcome == DamageOutcome::Killed;

        damage_dealt_events.write(DamageDealt {
            source: request.source,
            target: request.target,
            amount: request.amount,
            remaining_health: health.current,
            target_died: died,
        });

        if died {
            entity_died_events.write(EntityDied {
                entity: request.target,
                killer: request.source,
            });
            commands.entity(request.target).try_insert(Dead);

            crate::log_info(&format!(
                "💀 Entity {:?} killed by {:?} (health {})",
                request.target, request.source, health.current
            ));
        }
    }
}

/// Система: death sequence для NPC
///
/// Спавним каждый item из DropTable на DROP_HEIGHT над NPC, затем despawn.
/// EntityDied приходит ровно один раз на смерть (DamageOutcome::Killed).
pub fn run_death_sequence(
    mut commands: Commands,
    mut death_events: EventReader<EntityDied>,
    npcs: Query<(&Transform, &DropTable), With<Npc>>,
) {
    for event in death_events.read() {
        let Ok((transform, drops)) = npcs.get(event.entity) else {
            // Не NPC (например игрок) — death sequence не наша забота
            continue;
        };

        let drop_position = transform.translation + Vec3::Y * DROP_HEIGHT;
        for spec in &drops.items {
            spawn_item(&mut commands, spec.clone(), drop_position, Quat::IDENTITY);
        }

        commands.entity(event.entity).despawn();

        crate::log_info(&format!(
            "NPC {:?} removed after death ({} items dropped)",
            event.entity,
            drops.items.len()
        ));
    }
}
