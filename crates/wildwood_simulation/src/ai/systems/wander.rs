//! Wander systems: выбор случайной точки на navmesh + scheduled wander resume.

use bevy::prelude::*;
use rand::Rng;

use crate::ai::systems::fsm::NpcControls;
use crate::ai::{AIConfig, AIState, ScheduledWander};
use crate::combat::Dead;
use crate::components::Npc;
use crate::navigation::{NavAgent, NavMesh, NavigationService};
use crate::presentation::AnimationState;
use crate::DeterministicRng;

/// Сколько раз пересэмплируем слишком близкую точку (защита от бесконечного цикла)
pub const MAX_WANDER_RESAMPLES: u32 = 30;

/// Результат сэмплинга wander точки
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WanderSample {
    pub point: Vec3,
    /// Сколько пересэмплирований понадобилось (0..=MAX_WANDER_RESAMPLES)
    pub resamples: u32,
    /// false → лимит исчерпан, точка может быть ближе detect_distance
    pub satisfied: bool,
}

/// Равномерное значение в [min, max]; при min >= max (или бесконечном диапазоне) возвращает min
pub fn random_in<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if min < max && (max - min).is_finite() {
        rng.gen_range(min..=max)
    } else {
        min
    }
}

/// Случайная точка на поверхности единичной сферы (равномерно)
pub fn random_unit_vector<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let z: f32 = rng.gen_range(-1.0..=1.0);
    let theta: f32 = rng.gen_range(0.0..std::f32::consts::TAU);
    let radius = (1.0 - z * z).max(0.0).sqrt();

    Vec3::new(radius * theta.cos(), radius * theta.sin(), z)
}

/// Выбрать wander точку вокруг origin
///
/// Направление на сфере × дистанция в [min_wander, max_wander], затем snap к navmesh
/// в радиусе max_wander_distance. Точки ближе detect_distance отбрасываем и пересэмплируем,
/// не более MAX_WANDER_RESAMPLES раз; после этого принимаем последнюю как есть.
/// Если navmesh ни разу не дал точку — возвращаем origin.
pub fn sample_wander_destination<R: Rng + ?Sized>(
    origin: Vec3,
    config: &AIConfig,
    nav_mesh: &dyn NavigationService,
    rng: &mut R,
) -> WanderSample {
    let sample_once = |rng: &mut R| {
        let distance = random_in(rng, config.min_wander_distance, config.max_wander_distance);
        let candidate = origin + random_unit_vector(rng) * distance;
        nav_mesh.sample_walkable(candidate, config.max_wander_distance)
    };

    let far_enough =
        |point: Option<Vec3>| point.is_some_and(|p| origin.distance(p) >= config.detect_distance);

    let mut last_walkable = None;
    let mut hit = sample_once(rng);
    let mut resamples = 0;

    while !far_enough(hit) {
        last_walkable = hit.or(last_walkable);
        if resamples == MAX_WANDER_RESAMPLES {
            break;
        }
        hit = sample_once(rng);
        resamples += 1;
    }

    let satisfied = far_enough(hit);
    let point = hit.or(last_walkable).unwrap_or(origin);

    WanderSample {
        point,
        resamples,
        satisfied,
    }
}

/// Система: срабатывание scheduled wander (аналог отложенного вызова по таймеру)
///
/// Guard: переходим в Wandering ТОЛЬКО если NPC всё ещё Idle.
/// Обнаружение цели во время ожидания делает таймер no-op.
pub fn fire_scheduled_wander(
    mut npcs: Query<
        (
            Entity,
            &Transform,
            &AIConfig,
            &mut ScheduledWander,
            &mut AIState,
            &mut NavAgent,
            &mut AnimationState,
        ),
        (With<Npc>, Without<Dead>),
    >,
    nav_mesh: Res<NavMesh>,
    mut rng: ResMut<DeterministicRng>,
    time: Res<Time<Fixed>>,
) {
    let now = time.elapsed_secs();

    for (entity, transform, config, mut scheduled, mut state, mut nav, mut animation) in
        npcs.iter_mut()
    {
        if !scheduled.take_due(now) {
            continue;
        }

        if *state != AIState::Idle {
            crate::log(&format!(
                "AI: {:?} scheduled wander skipped (state {})",
                entity,
                state.as_str()
            ));
            continue;
        }

        let position = transform.translation;
        let mut controls = NpcControls {
            entity,
            position,
            config,
            state: &mut *state,
            nav: &mut *nav,
            animation: &mut *animation,
        };
        controls.set_state(AIState::Wandering);

        let sample = sample_wander_destination(position, config, nav_mesh.service(), &mut rng.rng);
        if !sample.satisfied {
            crate::log(&format!(
                "AI: {:?} wander sampling exhausted after {} resamples, accepting {:?}",
                entity, sample.resamples, sample.point
            ));
        }

        if !controls
            .nav
            .set_destination(nav_mesh.service(), position, sample.point)
        {
            crate::log(&format!(
                "AI: {:?} no path to wander point {:?}, will idle again",
                entity, sample.point
            ));
        }
    }
}
