#![forbid(unsafe_code)]

pub mod model;
pub mod planner;
pub mod quiz;
pub mod time;

pub use time::Clock;
