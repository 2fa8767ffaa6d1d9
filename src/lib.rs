//! Chess rules engine with a ten-tier heuristic computer opponent,
//! save/load in a PGN-style text format and a JSON REST surface.

pub mod ai;
pub mod api;
pub mod config;
pub mod engine;
