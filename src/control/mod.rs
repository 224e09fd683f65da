pub mod engine;

pub use engine::{evaluate, ControlCommand};
