//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and a
//! `run` handler.
//!
//! # Command Modules
//!
//! - [`search`] - Search the spot catalogue with filters
//! - [`show`] - Show a single spot in detail
//! - [`chat`] - Ask the recommendation assistant
//! - [`trending`] - List the most popular verified spots

pub mod chat;
pub mod common;
pub mod search;
pub mod show;
pub mod trending;
