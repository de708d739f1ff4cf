pub mod config;
pub mod goal;
pub mod journal;
pub mod mood;
pub mod resources;
pub mod session;
pub mod stats;
