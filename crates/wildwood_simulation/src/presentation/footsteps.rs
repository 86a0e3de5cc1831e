//! Footsteps — звук шагов по фактической скорости актора

use bevy::prelude::*;
use rand::Rng;

use crate::navigation::NavAgent;
use crate::DeterministicRng;

/// Вертикальная скорость ниже которой актор считается на земле (м/с)
pub const GROUNDED_VERTICAL_SPEED: f32 = 0.1;

/// Параметры шагов актора
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Footsteps {
    /// Минимальная скорость для шагов (м/с)
    pub threshold: f32,
    /// Минимальный интервал между шагами (секунды)
    pub rate: f32,
    /// Сколько вариантов звука (индекс клипа выбирается случайно)
    pub clip_count: u32,
    pub last_step_time: f32,
}

impl Default for Footsteps {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            rate: 0.5,
            clip_count: 4,
            last_step_time: 0.0,
        }
    }
}

impl Footsteps {
    /// Шаг должен прозвучать при такой скорости в момент `now`
    pub fn should_step(&self, velocity: Vec3, now: f32) -> bool {
        velocity.y.abs() < GROUNDED_VERTICAL_SPEED
            && velocity.length() > self.threshold
            && now - self.last_step_time > self.rate
    }
}

/// Событие: шаг (clip — индекс звука в наборе)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FootstepPlayed {
    pub entity: Entity,
    pub clip: u32,
}

/// Система: шаги по velocity NavAgent
pub fn emit_footsteps(
    mut walkers: Query<(Entity, &NavAgent, &mut Footsteps)>,
    mut rng: ResMut<DeterministicRng>,
    time: Res<Time<Fixed>>,
    mut steps: EventWriter<FootstepPlayed>,
) {
    let now = time.elapsed_secs();

    for (entity, agent, mut footsteps) in walkers.iter_mut() {
        if footsteps.clip_count == 0 || !footsteps.should_step(agent.velocity, now) {
            continue;
        }

        footsteps.last_step_time = now;
        let clip = rng.rng.gen_range(0..footsteps.clip_count);
        steps.write(FootstepPlayed { entity, clip });
    }
}
