//! NavAgent — per-agent навигационное состояние + система движения по пути

use bevy::prelude::*;

use super::{NavPath, NavigationService};

/// Навигационный агент (аналог NavigationAgent движка)
///
/// AI пишет сюда intent (destination, speed, stop/resume),
/// `advance_nav_agents` исполняет движение.
#[derive(Component, Debug, Clone, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct NavAgent {
    /// Скорость движения по пути (м/с)
    pub speed: f32,
    /// true → агент стоит, путь сохраняется
    pub is_stopped: bool,
    /// Фактическая скорость за последний тик (для footsteps)
    pub velocity: Vec3,
    destination: Option<Vec3>,
    /// Оставшаяся часть пути
    path: NavPath,
}

impl NavAgent {
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    pub fn stop(&mut self) {
        self.is_stopped = true;
    }

    pub fn resume(&mut self) {
        self.is_stopped = false;
    }

    /// Рассчитать путь from → to и сделать его текущим
    ///
    /// false → путь не найден, destination и путь сброшены.
    pub fn set_destination(&mut self, nav_mesh: &dyn NavigationService, from: Vec3, to: Vec3) -> bool {
        match nav_mesh.compute_path(from, to) {
            Some(path) => {
                self.destination = Some(path.corners.last().copied().unwrap_or(from));
                self.path = path;
                true
            }
            None => {
                self.destination = None;
                self.path.corners.clear();
                false
            }
        }
    }

    /// Destination = текущая позиция (путь пустой, идти некуда)
    pub fn clear_destination(&mut self, here: Vec3) {
        self.destination = Some(here);
        self.path.corners.clear();
    }

    pub fn destination(&self) -> Option<Vec3> {
        self.destination
    }

    pub fn has_path(&self) -> bool {
        !self.path.corners.is_empty()
    }

    /// Агент реально движется (не остановлен и есть куда идти)
    pub fn is_moving(&self) -> bool {
        !self.is_stopped && self.has_path()
    }

    /// Остаток пути от текущей позиции (0 если пути нет)
    pub fn remaining_distance(&self, from: Vec3) -> f32 {
        self.path.length_from(from)
    }

    /// Продвинуться по пути на `speed * delta`, вернуть новую позицию
    fn step(&mut self, position: Vec3, delta: f32) -> Vec3 {
        let mut budget = self.speed * delta;
        let mut current = position;

        while budget > 0.0 {
            let Some(&next) = self.path.corners.first() else {
                break;
            };

            let distance = current.distance(next);
            if distance <= budget {
                current = next;
                budget -= distance;
                self.path.corners.remove(0);
            } else {
                current += (next - current) / distance * budget;
                budget = 0.0;
            }
        }

        current
    }
}

/// Система: движение NavAgent по пути
///
/// Остановленные агенты и агенты без пути стоят (velocity = 0).
/// Агент разворачивается лицом по направлению движения (горизонтально).
pub fn advance_nav_agents(
    mut agents: Query<(&mut Transform, &mut NavAgent)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();
    if delta <= 0.0 {
        return;
    }

    for (mut transform, mut agent) in agents.iter_mut() {
        if !agent.is_moving() || agent.speed <= 0.0 {
            agent.velocity = Vec3::ZERO;
            continue;
        }

        let start = transform.translation;
        let end = agent.step(start, delta);
        agent.velocity = (end - start) / delta;

        let heading = Vec3::new(end.x - start.x, 0.0, end.z - start.z);
        if heading.length_squared() > 1e-8 {
            transform.look_to(heading, Vec3::Y);
        }
        transform.translation = end;
    }
}
