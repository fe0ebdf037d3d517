//! Controller layer: UI events and intents, command orchestration and view rebuilding.

pub mod events;
pub mod orchestration;
