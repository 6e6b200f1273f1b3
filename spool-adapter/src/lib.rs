//! Scroll coordination for the `spool` list engine.
//!
//! `spool` decides which items exist and where they sit for a given pixel delta. This crate turns
//! gestures into those deltas:
//!
//! - [`ListController`] owns a layouter and a [`spool::Scroller`], and runs the fill, offset and
//!   anchor pipeline for drags, wheel and touch flings, smooth scrolls and resizes.
//! - [`VelocityTracker`] estimates release velocity from recent drag samples.
//! - [`ScrollInput`] is the framework-neutral gesture event.
//!
//! Like `spool`, this crate holds no UI objects and reads no clock; callers pass `now_ns`.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod controller;
mod input;
mod velocity;

#[cfg(test)]
mod tests;

pub use controller::{ListController, ListControllerOptions, ScrollbarThumb};
pub use input::ScrollInput;
pub use velocity::VelocityTracker;
