//! Event types exchanged across the game.
//!
//! Submodules:
//! - [`audio`] – commands and messages for the background audio thread
//! - [`contact`] – physics contact notifications and their dispatch to
//!   collision callbacks
pub mod audio;
pub mod contact;
