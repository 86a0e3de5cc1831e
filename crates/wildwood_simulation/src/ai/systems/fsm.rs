//! FSM AI systems (perception → dispatch → transitions, combat timing).
//!
//! Порядок внутри тика (на каждого NPC):
//! 1. Perception: distance до цели + field of view
//! 2. Presentation flag `moving` (state != Idle)
//! 3. Dispatch: Idle/Wandering → passive_update, Attacking → attacking_update

use bevy::prelude::*;
use rand::Rng;

use crate::ai::perception::Perception;
use crate::ai::systems::wander::random_in;
use crate::ai::{AIConfig, AIState, PursuitTarget, ScheduledWander};
use crate::combat::{ApplyDamage, Attacker, Dead};
use crate::components::{Health, Npc};
use crate::navigation::{NavAgent, NavMesh, NavigationService};
use crate::presentation::{AnimationState, AnimationTrigger, AnimationTriggered};
use crate::DeterministicRng;

/// Wandering считается завершённым когда остаток пути меньше этого (метры)
pub const ARRIVAL_THRESHOLD: f32 = 0.1;

/// Мутабельный view одного NPC на время тика
///
/// `set_state` — единственный способ сменить AIState.
pub struct NpcControls<'a> {
    pub entity: Entity,
    pub position: Vec3,
    pub config: &'a AIConfig,
    pub state: &'a mut AIState,
    pub nav: &'a mut NavAgent,
    pub animation: &'a mut AnimationState,
}

impl NpcControls<'_> {
    /// Сменить состояние + синхронизировать скорость, stop/resume и animation rate
    pub fn set_state(&mut self, new_state: AIState) {
        let previous = *self.state;
        *self.state = new_state;

        let speed = self.config.speed_for(new_state);
        self.nav.set_speed(speed);

        match new_state {
            AIState::Idle => self.nav.stop(),
            AIState::Wandering | AIState::Attacking => self.nav.resume(),
        }

        self.animation.speed_scale = self.config.animation_rate_for(speed);

        if previous != new_state {
            crate::log(&format!(
                "AI: {:?} {} → {} (speed {:.1})",
                self.entity,
                previous.as_str(),
                new_state.as_str(),
                speed
            ));
        }
    }
}

/// Idle/Wandering: прибытие → Idle + scheduled wander; цель в detect_distance → Attacking
///
/// Обе проверки выполняются в одном тике (arrival первым).
pub fn passive_update<R: Rng + ?Sized>(
    controls: &mut NpcControls<'_>,
    scheduled: &mut ScheduledWander,
    perception: &Perception,
    rng: &mut R,
    now: f32,
) {
    if *controls.state == AIState::Wandering
        && controls.nav.remaining_distance(controls.position) < ARRIVAL_THRESHOLD
    {
        controls.set_state(AIState::Idle);

        let delay = random_in(
            rng,
            controls.config.min_wander_wait_time,
            controls.config.max_wander_wait_time,
        );
        scheduled.schedule(now, delay);
    }

    if perception.distance < controls.config.detect_distance {
        controls.set_state(AIState::Attacking);
    }
}

/// Attacking: атака в радиусе+FOV, иначе преследование, иначе возврат к Wandering
///
/// Возвращает урон если атака состоялась на этом тике.
pub fn attacking_update(
    controls: &mut NpcControls<'_>,
    attacker: &mut Attacker,
    perception: &Perception,
    nav_mesh: &dyn NavigationService,
    now: f32,
) -> Option<i32> {
    let config = controls.config;

    if perception.distance < config.attack_distance && perception.in_field_of_view {
        // Стоим на месте во время атаки
        controls.nav.stop();

        let damage = attacker.try_attack(now)?;
        // NPC стоит — animation rate обратно на 1x
        controls.animation.speed_scale = 1.0;
        return Some(damage);
    }

    if perception.distance < config.detect_distance {
        if let Some(target_position) = perception.target_position {
            controls.nav.resume();
            if controls
                .nav
                .set_destination(nav_mesh, controls.position, target_position)
            {
                return None;
            }

            crate::log(&format!(
                "AI: {:?} no path to target at {:?}, giving up chase",
                controls.entity, target_position
            ));
        }
    }

    // Цель ушла или недостижима
    controls.nav.clear_destination(controls.position);
    controls.nav.stop();
    controls.set_state(AIState::Wandering);
    None
}

/// Система: аналог Start() — каждый новый NPC входит в Wandering через set_state
pub fn initialize_spawned_npcs(
    mut npcs: Query<
        (Entity, &Transform, &AIConfig, &mut AIState, &mut NavAgent, &mut AnimationState),
        Added<Npc>,
    >,
) {
    for (entity, transform, config, mut state, mut nav, mut animation) in npcs.iter_mut() {
        let mut controls = NpcControls {
            entity,
            position: transform.translation,
            config,
            state: &mut *state,
            nav: &mut *nav,
            animation: &mut *animation,
        };
        controls.set_state(AIState::Wandering);
    }
}

/// Система: NPC behavior tick (perception + state dispatch)
///
/// Мёртвые NPC (Dead marker) пропускаются — после смерти никаких обновлений.
/// Ошибка lookup одного NPC не влияет на остальных.
pub fn npc_behavior_tick(
    mut npcs: Query<
        (
            Entity,
            &Transform,
            &AIConfig,
            &mut AIState,
            &mut NavAgent,
            &mut AnimationState,
            &mut ScheduledWander,
            &mut Attacker,
            Option<&PursuitTarget>,
        ),
        (With<Npc>, Without<Dead>),
    >,
    targets: Query<(&Transform, Option<&Health>)>,
    nav_mesh: Res<NavMesh>,
    mut rng: ResMut<DeterministicRng>,
    time: Res<Time<Fixed>>,
    mut damage_requests: EventWriter<ApplyDamage>,
    mut triggers: EventWriter<AnimationTriggered>,
) {
    let now = time.elapsed_secs();

    for (
        entity,
        transform,
        config,
        mut state,
        mut nav,
        mut animation,
        mut scheduled,
        mut attacker,
        pursuit,
    ) in npcs.iter_mut()
    {
        let target = pursuit.map(|p| p.0);

        let perception = match target.and_then(|t| targets.get(t).ok()) {
            Some((target_transform, health)) if health.map_or(true, Health::is_alive) => {
                Perception::observe(transform, target_transform.translation, config.field_of_view)
            }
            // Цели нет или она мертва — ведём себя как будто она далеко
            _ => Perception::LOST,
        };

        // Локальные копии: change detection срабатывает только при реальных изменениях
        let mut current_state = *state;
        let mut current_animation = *animation;
        current_animation.moving = current_state != AIState::Idle;

        let mut controls = NpcControls {
            entity,
            position: transform.translation,
            config,
            state: &mut current_state,
            nav: &mut *nav,
            animation: &mut current_animation,
        };

        match *controls.state {
            AIState::Idle | AIState::Wandering => {
                passive_update(&mut controls, &mut *scheduled, &perception, &mut rng.rng, now);
            }
            AIState::Attacking => {
                let landed =
                    attacking_update(&mut controls, &mut *attacker, &perception, nav_mesh.service(), now);

                if let (Some(damage), Some(target)) = (landed, target) {
                    damage_requests.write(ApplyDamage {
                        source: Some(entity),
                        target,
                        amount: damage,
                    });
                    triggers.write(AnimationTriggered {
                        entity,
                        trigger: AnimationTrigger::Attack,
                    });
                    crate::log(&format!(
                        "⚔️ AI: {:?} attacks {:?} for {} damage (distance {:.2})",
                        entity, target, damage, perception.distance
                    ));
                }
            }
        }

        state.set_if_neq(current_state);
        animation.set_if_neq(current_animation);
    }
}
