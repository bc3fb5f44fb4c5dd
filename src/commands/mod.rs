//! CLI command implementations
//!
//! `parse` and `list` work without hardware. `run` holds the actions that
//! need an opened programmer; see [`crate::programmers::with_programmer`].

mod list;
pub mod parse;
pub mod run;

pub use list::list_programmers;
