//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: базовые характеристики (Health, DamageSink, Player/Npc markers)
//! - ai: state machine и параметры поведения (AIState, AIConfig)

pub mod actor;
pub mod ai;

// Re-exports для удобного импорта
pub use actor::*;
pub use ai::*;
