//! Core game logic. Keep this crate free of IO and platform concerns.

pub mod boss;
pub mod cards;
pub mod config;
pub mod consumables;
pub mod deck;
pub mod events;
pub mod hand;
pub mod heat;
pub mod inventory;
pub mod jokers;
pub mod levels;
pub mod rng;
pub mod rules;
pub mod run;
pub mod scoring;
pub mod state;

pub use boss::*;
pub use cards::*;
pub use config::*;
pub use consumables::*;
pub use deck::*;
pub use events::*;
pub use hand::*;
pub use heat::*;
pub use inventory::*;
pub use jokers::*;
pub use levels::*;
pub use rng::*;
pub use rules::*;
pub use run::*;
pub use scoring::*;
pub use state::*;
