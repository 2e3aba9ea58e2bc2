//! Pure computational algorithms for the vacuum simulator
//!
//! No I/O and no rendering: everything here can be driven from tests or
//! from the headless [`Simulation`](crate::simulation::Simulation).
//!
//! # Available Algorithms
//!
//! ## World
//! - **house_grid**: Wall and dust layers, interior checks, free-spot sampling, wall sensors
//! - **layout**: Rectangle, default and brush-drawn wall layouts
//!
//! ## Motion
//! - **kinematics**: Unicycle integration with collision rollback
//!
//! ## Control
//! - **navigation**: Manual, wall-following and random-bounce controllers

pub mod house_grid;
pub mod kinematics;
pub mod layout;
pub mod navigation;
