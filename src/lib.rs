//! `fmg-vault` - Fantasy Map Generator to Markdown vault converter
//!
//! Turns the `pack` collections of an FMG JSON export into one Markdown
//! document per entity, cross-linked with wiki links, with emblems and
//! optional MFCG settlement assets copied into the vault.

pub mod assets;
pub mod cli;
pub mod config;
pub mod convert;
pub mod emblems;
pub mod entities;
pub mod error;
pub mod lore;
pub mod observability;
pub mod pack;
pub mod vault;
