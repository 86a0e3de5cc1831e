//! Headless симуляция Wildwood
//!
//! Стая NPC из архетипа, игрок идёт в центр стаи и отбивается.
//! Usage: wildwood_simulation [archetype.ron]

use bevy::prelude::*;
use wildwood_simulation::item_system::GatherHit;
use wildwood_simulation::*;

const SEED: u64 = 42;
const TICKS: u32 = 1000;
const PACK_SIZE: usize = 3;

const PLAYER_SPEED: f32 = 3.0;
const PLAYER_DAMAGE: i32 = 15;
const PLAYER_REACH: f32 = 2.5;
const PLAYER_SWING_RATE: f32 = 0.5;

/// Скриптованный игрок (вместо input)
#[derive(Component)]
struct ScriptedPlayer {
    swing: Attacker,
}

/// Игрок бьёт ближайшего живого NPC в радиусе PLAYER_REACH
fn scripted_player_strikes(
    mut players: Query<(Entity, &Transform, &Health, &mut ScriptedPlayer)>,
    npcs: Query<(Entity, &Transform), (With<Npc>, Without<Dead>)>,
    time: Res<Time<Fixed>>,
    mut damage: EventWriter<ApplyDamage>,
) {
    let now = time.elapsed_secs();

    for (player, player_transform, health, mut script) in players.iter_mut() {
        if !health.is_alive() {
            continue;
        }

        let nearest = npcs
            .iter()
            .map(|(npc, t)| (npc, t.translation.distance(player_transform.translation)))
            .filter(|(_, distance)| *distance < PLAYER_REACH)
            .min_by(|a, b| a.1.total_cmp(&b.1));

        let Some((target, _)) = nearest else {
            continue;
        };

        if let Some(amount) = script.swing.try_attack(now) {
            damage.write(ApplyDamage {
                source: Some(player),
                target,
                amount,
            });
        }
    }
}

fn load_archetype() -> NpcArchetype {
    let loaded = match std::env::args().nth(1) {
        Some(path) => NpcArchetype::load(&path),
        None => NpcArchetype::builtin(),
    };

    match loaded {
        Ok(archetype) => archetype,
        Err(err) => {
            log_error(&format!("{}; falling back to default archetype", err));
            NpcArchetype {
                name: "Wolf".into(),
                health: 40,
                ai: AIConfig::default(),
                damage: 8,
                attack_rate: 1.0,
                drops: Vec::new(),
            }
        }
    }
}

fn main() {
    let mut app = create_headless_app(SEED);
    set_log_level(LogLevel::Info);
    app.add_plugins(SimulationPlugin)
        .add_systems(
            FixedUpdate,
            scripted_player_strikes.in_set(SimulationSet::Behavior),
        );

    let archetype = load_archetype();
    log_info(&format!(
        "Starting Wildwood headless simulation (seed: {}, archetype: {})",
        SEED, archetype.name
    ));

    let pack_center = Vec3::new(20.0, 0.0, 0.0);
    let player = app
        .world_mut()
        .spawn((
            Player,
            Name::new("Player"),
            Transform::from_translation(Vec3::ZERO),
            Health::new(100),
            NavAgent::default(),
            Footsteps::default(),
            SurfaceTint::default(),
            ScriptedPlayer {
                swing: Attacker::new(PLAYER_DAMAGE, PLAYER_SWING_RATE),
            },
        ))
        .id();

    {
        let world = app.world_mut();
        let mut commands = world.commands();
        for i in 0..PACK_SIZE {
            let offset = Vec3::new(i as f32 * 2.0, 0.0, (i as f32 - 1.0) * 3.0);
            spawn_npc(&mut commands, &archetype, pack_center + offset, Some(player));
        }

        commands.spawn((
            Name::new("Tree"),
            Transform::from_translation(Vec3::new(-5.0, 0.0, 5.0)),
            ResourceNode::new(ItemSpec::new("wood_log", "Wood Log"), 2, 6),
        ));
    }
    app.world_mut().flush();

    // Игрок идёт к стае
    {
        let world = app.world_mut();
        let nav_mesh = world.remove_resource::<NavMesh>().unwrap_or_default();
        if let Some(mut agent) = world.get_mut::<NavAgent>(player) {
            agent.set_speed(PLAYER_SPEED);
            agent.set_destination(nav_mesh.service(), Vec3::ZERO, pack_center);
        }
        world.insert_resource(nav_mesh);
    }

    for tick in 0..TICKS {
        if tick == 50 {
            let tree = app
                .world_mut()
                .query_filtered::<Entity, With<ResourceNode>>()
                .iter(app.world())
                .next();
            if let Some(node) = tree {
                app.world_mut().send_event(GatherHit {
                    node,
                    hit_point: Vec3::new(-5.0, 1.0, 5.0),
                    hit_normal: Vec3::X,
                });
            }
        }

        app.update();

        if tick % 100 == 0 {
            let world = app.world_mut();
            let alive = world
                .query_filtered::<(), (With<Npc>, Without<Dead>)>()
                .iter(world)
                .count();
            let items = world.query::<&DroppedItem>().iter(world).count();
            let player_health = world.get::<Health>(player).map_or(0, |h| h.current);

            log_info(&format!(
                "Tick {}: {} NPC alive, {} items on ground, player health {}",
                tick, alive, items, player_health
            ));
        }
    }

    log_info("Simulation complete!");
}
