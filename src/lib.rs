//! A ball-in-a-maze game: a randomly carved perfect maze, handed to a physics
//! engine as static walls, with a keyboard-driven ball racing for the far
//! corner.

pub mod config;
pub mod game;
pub mod input;
pub mod layout;
pub mod maze;
pub mod render;
pub mod world;
