//! NPC behavior integration tests
//!
//! Полный SimulationPlugin в headless App, тик за тиком.
//! Первый `app.update()` только стартует часы (fixed tick не выполняется),
//! каждый следующий = ровно один FixedUpdate тик.

use bevy::prelude::*;
use wildwood_simulation::item_system::GatherHit;
use wildwood_simulation::presentation::{AnimationTrigger, AnimationTriggered, SurfaceColor};
use wildwood_simulation::*;

/// Helper: App со всеми simulation plugins
fn create_simulation_app(seed: u64) -> App {
    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin);
    app
}

fn archetype(health: i32, ai: AIConfig, drops: Vec<ItemSpec>) -> NpcArchetype {
    NpcArchetype {
        name: "Wolf".into(),
        health,
        ai,
        damage: 10,
        attack_rate: 1.0,
        drops,
    }
}

fn spawn_player(app: &mut App, position: Vec3) -> Entity {
    app.world_mut()
        .spawn((
            Player,
            Transform::from_translation(position),
            Health::new(100),
            SurfaceTint::default(),
        ))
        .id()
}

fn spawn(app: &mut App, archetype: &NpcArchetype, position: Vec3, target: Option<Entity>) -> Entity {
    let world = app.world_mut();
    let entity = spawn_npc(&mut world.commands(), archetype, position, target);
    world.flush();
    entity
}

fn run_ticks(app: &mut App, updates: usize) {
    for _ in 0..updates {
        app.update();
    }
}

fn state_of(app: &App, npc: Entity) -> AIState {
    *app.world().get::<AIState>(npc).expect("npc must have AIState")
}

#[test]
fn test_npc_detects_chases_and_damages_player() {
    let mut app = create_simulation_app(42);
    let player = spawn_player(&mut app, Vec3::ZERO);
    let npc = spawn(
        &mut app,
        &archetype(40, AIConfig::default(), Vec::new()),
        Vec3::new(0.0, 0.0, -5.0),
        Some(player),
    );

    // Первый fixed tick: Wandering → (нет пути) Idle → цель в 5м → Attacking
    run_ticks(&mut app, 2);
    assert_eq!(state_of(&app, npc), AIState::Attacking);
    assert_eq!(app.world().get::<NavAgent>(npc).unwrap().speed, AIConfig::default().run_speed);

    // 3м при 5 м/с ≈ 36 тиков, дальше атака
    run_ticks(&mut app, 100);

    let health = app.world().get::<Health>(player).unwrap();
    assert!(health.current <= 90, "player health {}", health.current);
    assert_eq!((100 - health.current) % 10, 0);
    assert_eq!(state_of(&app, npc), AIState::Attacking);

    let npc_position = app.world().get::<Transform>(npc).unwrap().translation;
    assert!(npc_position.distance(Vec3::ZERO) < 2.0);
}

#[test]
fn test_behavior_tick_drives_animation_and_attack_trigger() {
    let mut app = create_simulation_app(42);
    let player = spawn_player(&mut app, Vec3::new(0.0, 0.0, -50.0));
    let npc = spawn(
        &mut app,
        &archetype(40, AIConfig::default(), Vec::new()),
        Vec3::ZERO,
        Some(player),
    );

    // Тик 1: Wandering → Idle (нет пути), тик 2: moving берётся из Idle
    run_ticks(&mut app, 3);
    assert_eq!(state_of(&app, npc), AIState::Idle);
    assert!(!app.world().get::<AnimationState>(npc).unwrap().moving);

    // Игрок в радиусе обнаружения, но вне дистанции атаки
    app.world_mut().get_mut::<Transform>(player).unwrap().translation = Vec3::new(0.0, 0.0, -6.0);
    run_ticks(&mut app, 2);
    assert_eq!(state_of(&app, npc), AIState::Attacking);
    let chasing = *app.world().get::<AnimationState>(npc).unwrap();
    assert!(chasing.moving);
    assert!(chasing.speed_scale > 1.0, "run speed scales animation, got {}", chasing.speed_scale);

    let mut attack_tick_seen = false;
    for _ in 0..120 {
        app.update();
        if app.world().get::<Health>(player).unwrap().current == 100 {
            continue;
        }

        let triggers = app.world().resource::<Events<AnimationTriggered>>();
        let mut cursor = triggers.get_cursor();
        let fired: Vec<AnimationTriggered> = cursor.read(triggers).copied().collect();
        assert_eq!(
            fired,
            vec![AnimationTriggered {
                entity: npc,
                trigger: AnimationTrigger::Attack,
            }]
        );
        assert_eq!(app.world().get::<AnimationState>(npc).unwrap().speed_scale, 1.0);

        attack_tick_seen = true;
        break;
    }

    assert!(attack_tick_seen, "NPC never landed an attack");
}

#[test]
fn test_lethal_damage_drops_items_and_removes_npc() {
    let mut app = create_simulation_app(42);
    let drops = vec![
        ItemSpec::new("raw_meat", "Raw Meat"),
        ItemSpec::new("wolf_pelt", "Wolf Pelt"),
    ];
    let npc = spawn(
        &mut app,
        &archetype(5, AIConfig::default(), drops),
        Vec3::new(3.0, 0.0, 3.0),
        None,
    );

    app.update();

    // Два удара в одном тике — смерть всё равно одна
    app.world_mut().send_event(ApplyDamage {
        source: None,
        target: npc,
        amount: 10,
    });
    app.world_mut().send_event(ApplyDamage {
        source: None,
        target: npc,
        amount: 10,
    });
    app.update();

    assert!(app.world().get::<Health>(npc).is_none(), "dead NPC must be despawned");

    let deaths = app.world().resource::<Events<EntityDied>>();
    let mut cursor = deaths.get_cursor();
    assert_eq!(cursor.read(deaths).count(), 1);

    let dealt = app.world().resource::<Events<DamageDealt>>();
    let mut cursor = dealt.get_cursor();
    let dealt: Vec<_> = cursor.read(dealt).copied().collect();
    assert_eq!(dealt.len(), 1);
    assert_eq!(dealt[0].remaining_health, -5);
    assert!(dealt[0].target_died);

    let world = app.world_mut();
    let mut items: Vec<(String, Vec3)> = world
        .query::<(&DroppedItem, &Transform)>()
        .iter(world)
        .map(|(item, transform)| (item.spec.id.0.clone(), transform.translation))
        .collect();
    items.sort_by(|a, b| a.0.cmp(&b.0));

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].0, "raw_meat");
    assert_eq!(items[1].0, "wolf_pelt");
    for (_, position) in items {
        assert_eq!(position, Vec3::new(3.0, 2.0, 3.0));
    }
}

#[test]
fn test_survived_hit_flashes_then_reverts() {
    let mut app = create_simulation_app(42);
    let player = spawn_player(&mut app, Vec3::ZERO);

    app.update();
    app.world_mut().send_event(ApplyDamage {
        source: None,
        target: player,
        amount: 30,
    });
    app.update();

    assert_eq!(app.world().get::<Health>(player).unwrap().current, 70);
    assert_eq!(
        app.world().get::<SurfaceTint>(player).unwrap().color,
        SurfaceColor::DAMAGE_FLASH
    );

    // 0.1с = 6 тиков при 60Hz
    run_ticks(&mut app, 8);
    let tint = app.world().get::<SurfaceTint>(player).unwrap();
    assert_eq!(tint.color, SurfaceColor::WHITE);
    assert!(!tint.is_flashing());
}

fn quick_wander_config() -> AIConfig {
    AIConfig {
        min_wander_wait_time: 0.5,
        max_wander_wait_time: 0.5,
        ..Default::default()
    }
}

#[test]
fn test_idle_npc_resumes_wandering_after_wait() {
    let mut app = create_simulation_app(7);
    let npc = spawn(&mut app, &archetype(40, quick_wander_config(), Vec::new()), Vec3::ZERO, None);

    run_ticks(&mut app, 2);
    assert_eq!(state_of(&app, npc), AIState::Idle);
    assert!(app.world().get::<ScheduledWander>(npc).unwrap().resume_at.is_some());
    assert!(app.world().get::<NavAgent>(npc).unwrap().is_stopped);

    // Таймер 0.5с ≈ 30 тиков
    run_ticks(&mut app, 40);

    assert_eq!(state_of(&app, npc), AIState::Wandering);
    let nav = app.world().get::<NavAgent>(npc).unwrap();
    assert!(nav.is_moving());
    let destination = nav.destination().expect("wander destination");
    assert!(destination.distance(Vec3::ZERO) >= AIConfig::default().detect_distance);
    assert_eq!(app.world().get::<ScheduledWander>(npc).unwrap().resume_at, None);
}

#[test]
fn test_scheduled_wander_ignored_after_detection() {
    let mut app = create_simulation_app(7);
    let player = spawn_player(&mut app, Vec3::new(0.0, 0.0, -50.0));
    let npc = spawn(
        &mut app,
        &archetype(40, quick_wander_config(), Vec::new()),
        Vec3::ZERO,
        Some(player),
    );

    run_ticks(&mut app, 2);
    assert_eq!(state_of(&app, npc), AIState::Idle);

    // Игрок подходит пока NPC ждёт
    app.world_mut().get_mut::<Transform>(player).unwrap().translation = Vec3::new(0.0, 0.0, -5.0);
    run_ticks(&mut app, 40);

    // Таймер сработал (и был съеден), но NPC остался в Attacking
    assert_eq!(state_of(&app, npc), AIState::Attacking);
    assert_eq!(app.world().get::<ScheduledWander>(npc).unwrap().resume_at, None);
}

#[test]
fn test_unreachable_target_falls_back_to_wandering() {
    let mut app = create_simulation_app(42);
    app.insert_resource(NavMesh::new(FlatNavMesh::new(
        Vec2::splat(-5.0),
        Vec2::splat(5.0),
        0.0,
    )));

    // Игрок в 8м, за краем navmesh
    let player = spawn_player(&mut app, Vec3::new(8.0, 0.0, 0.0));
    let npc = spawn(&mut app, &archetype(40, AIConfig::default(), Vec::new()), Vec3::ZERO, Some(player));

    run_ticks(&mut app, 2);
    assert_eq!(state_of(&app, npc), AIState::Attacking);

    app.update();
    assert_eq!(state_of(&app, npc), AIState::Wandering);
    assert!(!app.world().get::<NavAgent>(npc).unwrap().is_moving());
    assert_eq!(app.world().get::<Health>(player).unwrap().current, 100);
}

#[test]
fn test_dead_target_is_not_chased() {
    let mut app = create_simulation_app(42);
    let player = spawn_player(&mut app, Vec3::new(0.0, 0.0, -5.0));
    app.world_mut().get_mut::<Health>(player).unwrap().current = 0;

    let npc = spawn(&mut app, &archetype(40, AIConfig::default(), Vec::new()), Vec3::ZERO, Some(player));

    run_ticks(&mut app, 10);
    assert_ne!(state_of(&app, npc), AIState::Attacking);
}

#[test]
fn test_gather_hits_spawn_resources_until_depleted() {
    let mut app = create_simulation_app(42);
    let node = app
        .world_mut()
        .spawn((
            Transform::default(),
            ResourceNode::new(ItemSpec::new("wood_log", "Wood Log"), 2, 3),
        ))
        .id();

    app.update();

    let hit = GatherHit {
        node,
        hit_point: Vec3::new(1.0, 0.5, 0.0),
        hit_normal: Vec3::X,
    };
    for _ in 0..3 {
        app.world_mut().send_event(hit);
        app.update();
    }

    assert!(app.world().get::<ResourceNode>(node).unwrap().is_depleted());

    let world = app.world_mut();
    let positions: Vec<Vec3> = world
        .query::<(&DroppedItem, &Transform)>()
        .iter(world)
        .map(|(_, transform)| transform.translation)
        .collect();

    assert_eq!(positions.len(), 3);
    for position in positions {
        assert_eq!(position, Vec3::new(1.0, 1.5, 0.0));
    }
}
