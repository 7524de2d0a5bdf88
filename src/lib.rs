// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod config;
pub mod controller;
pub mod format;
pub mod geo;
pub mod history;
pub mod location;
pub mod map;
pub mod runtime;
pub mod session;
pub mod track;

/// Display refresh interval: the readout recomputes at 1 Hz.
pub const TICK_RATE_MS: u64 = 1000;
