//! A headless list virtualization and scroll animation core.
//!
//! For input-driven list coordination (flings, wheel scrolling, scrollbars), see the
//! `spool-adapter` crate.
//!
//! The crate has two halves:
//! - **List layout**: [`ListLayouter`] implementations ([`LinearListLayouter`],
//!   [`GridListLayouter`], [`FlowListLayouter`]) decide which data positions are visible,
//!   materialize item views through a [`ListSource`], recycle off-screen ones through a
//!   [`ListItemRecycler`], and place them through a [`ListHost`].
//! - **Animation timing**: [`Scroller`] integrates scroll motion (linear, inertia, or
//!   [`BezierCurve`]-driven flings); [`AnimationDirector`] drives channels of [`Anitom`]s
//!   against a monotonic clock and reports through an [`AnimationDirectorListener`].
//!
//! It is UI-agnostic: the host owns the view tree and the frame clock, and calls in
//! synchronously from its input and draw callbacks.
//!
//! The default `std` feature adds [`InstantClock`]; without it the crate is `no_std` + `alloc`.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod anitom;
mod bezier;
mod clock;
mod column;
mod director;
mod float;
mod interpolator;
mod item;
mod layouter;
mod recycler;
mod scroller;
mod source;
mod types;


pub use anitom::{Anitom, ChannelId};
pub use bezier::{BezierCurve, CurvePoint};
pub use clock::{Clock, ManualClock};
#[cfg(feature = "std")]
pub use clock::InstantClock;
pub use column::{Column, ColumnCollection};
pub use director::{AnimationDirector, AnimationDirectorListener, Repeat};
pub use interpolator::{Easing, Interpolator};
pub use item::{ItemId, ListItem, Margins};
pub use layouter::{
    Binding, FlowListLayouter, GridListLayouter, LinearListLayouter, ListLayouter,
};
pub use recycler::ListItemRecycler;
pub use scroller::{BezierSpec, ScrollKind, Scroller, ScrollerConfig};
pub use source::{ListHost, ListSource};
pub use types::{Anchor, ExtentEstimate, Rect, ScrollDirection, Size};
