//! Core data structures and logic for Ninedraft, a 2d tile-based sandbox game.
//!
//! This crate only contains the simulation model: items, blocks, physical
//! things, inventory containers, crafting and the physical world itself. It
//! consumes semantic calls (move, click, use) and produces effects, it has no
//! dependency on any UI toolkit.

use thiserror::Error;

pub mod geom;
pub mod effect;

pub mod item;
pub mod block;
pub mod thing;

pub mod inventory;
pub mod craft;

pub mod world;


/// Errors raised by the game logic. Most of these indicate a programming
/// error, such as a missing factory case or an incomplete registration, and
/// are meant to fail fast rather than be recovered from.
#[derive(Error, Debug)]
pub enum GameError {
    /// No item is defined for the given factory key.
    #[error("no item defined for {0:?}")]
    UnknownItem(String),
    /// No block is defined for the given factory key.
    #[error("no block defined for {0:?}")]
    UnknownBlock(String),
    /// The given collision type name is not registered in the world.
    #[error("unknown collision type {0:?}")]
    UnknownCollisionType(String),
    /// The given position does not exist on the grid.
    #[error("invalid position ({0}, {1}) on grid")]
    InvalidPosition(usize, usize),
    /// A recipe does not match the dimensions of its crafter.
    #[error("wrong recipe dimensions; expecting {expected_rows}x{expected_columns} but got {rows}x{columns}")]
    RecipeDimensions {
        expected_rows: usize,
        expected_columns: usize,
        rows: usize,
        columns: usize,
    },
    /// The operation is valid but deliberately not implemented.
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
}
