//! Nightcatch library crate: re-exports all modules for integration testing.
//!
//! The binary crate (`main.rs`) is the actual game entry point.
//! This library crate exposes the same modules so that `tests/` integration
//! tests can import game types, systems, and resources without needing a
//! window or GPU.

pub mod shared;
pub mod config;
pub mod input;
pub mod clock;
pub mod data;
pub mod boat;
pub mod fishing;
pub mod hazards;
pub mod salvage;
pub mod voyage;
pub mod economy;
pub mod save;
pub mod world;
pub mod ui;
