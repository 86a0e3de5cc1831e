//! Navigation domain — контракт navmesh + headless исполнитель движения
//!
//! Архитектура:
//! - `NavigationService` — black-box navmesh (движок реализует свой, тут FlatNavMesh для headless)
//! - `NavAgent` — per-agent состояние: speed, stopped, путь (аналог NavigationAgent)
//! - `advance_nav_agents` — двигает Transform по пути (в движке эту роль играет его агент)

use bevy::prelude::*;

use crate::SimulationSet;

pub mod agent;
pub mod flat_mesh;

pub use agent::{advance_nav_agents, NavAgent};
pub use flat_mesh::FlatNavMesh;

/// Путь по navmesh: углы после стартовой точки, последний = destination
#[derive(Debug, Clone, Default, PartialEq, Reflect)]
pub struct NavPath {
    pub corners: Vec<Vec3>,
}

impl NavPath {
    pub fn new(corners: Vec<Vec3>) -> Self {
        Self { corners }
    }

    /// Длина пути от `from` через все углы
    pub fn length_from(&self, from: Vec3) -> f32 {
        let mut length = 0.0;
        let mut previous = from;
        for corner in &self.corners {
            length += previous.distance(*corner);
            previous = *corner;
        }
        length
    }
}

/// Capability: navmesh, который контроллер NPC использует как black box
pub trait NavigationService: Send + Sync + 'static {
    /// Ближайшая проходимая точка к origin в радиусе max_distance
    fn sample_walkable(&self, origin: Vec3, max_distance: f32) -> Option<Vec3>;

    /// Путь from → to; None если цель недостижима
    fn compute_path(&self, from: Vec3, to: Vec3) -> Option<NavPath>;
}

/// Resource: активный navmesh мира
#[derive(Resource)]
pub struct NavMesh(Box<dyn NavigationService>);

impl NavMesh {
    pub fn new(service: impl NavigationService) -> Self {
        Self(Box::new(service))
    }

    pub fn service(&self) -> &dyn NavigationService {
        self.0.as_ref()
    }
}

impl Default for NavMesh {
    fn default() -> Self {
        Self::new(FlatNavMesh::default())
    }
}

/// Navigation Plugin
///
/// `advance_nav_agents` в SimulationSet::Locomotion (после решений AI, до combat).
pub struct NavigationPlugin;

impl Plugin for NavigationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<NavMesh>().add_systems(
            FixedUpdate,
            advance_nav_agents.in_set(SimulationSet::Locomotion),
        );
    }
}
