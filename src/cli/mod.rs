//! Command-line interface.
//!
//! Argument definitions live in [`args`]; [`commands`] turns them into
//! library calls.

pub mod args;
pub mod commands;
