pub mod actions;
pub mod gate;
pub mod node;
pub mod registry;
