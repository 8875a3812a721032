//! Effects: the closed effect identifier set, the card library, and the
//! registry that maps identifiers to behavior.
//!
//! Every effect in the game is named by an [`EffectId`] variant; there is
//! no runtime registration. Adding an effect means adding a variant and a
//! match arm, and the compiler enforces that the arm exists.

pub mod cards;
mod handlers;
pub mod id;
mod registry;

pub use cards::{standard_cards, CardDef, CardKind, CardLibrary};
pub use id::EffectId;
pub use registry::EffectRegistry;
