//! AI systems (strategic layer logic)

pub mod fsm;
pub mod wander;

// Re-export all systems
pub use fsm::*;
pub use wander::*;
