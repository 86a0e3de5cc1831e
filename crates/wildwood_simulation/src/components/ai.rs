//! AI компоненты: state machine, config, scheduled wander

// NOTE: типы живут в crate::ai (components/fsm.rs), здесь только re-export для единообразия
pub use crate::ai::{AIConfig, AIState, PursuitTarget, ScheduledWander};
