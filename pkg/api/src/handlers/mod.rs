pub mod resources;
pub mod stats;
pub mod trace;
