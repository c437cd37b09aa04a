#![forbid(unsafe_code)]

//! Core: geometry, pointer/keyboard events, swipe gestures, and animation.
//!
//! # Role in Trellis
//! `trellis-core` is the input layer. It owns the normalized event types that
//! hosts translate their native input into, the swipe recognizer that turns a
//! pointer stream into a continuous displacement signal, and the tween
//! primitives that drive navigation transitions.
//!
//! # How it fits in the system
//! `trellis-layout` consumes these types to run its drag/resize machines,
//! pivots, stacks, and drawers. Nothing here knows about grids, groups, or
//! tabs.

pub mod animation;
pub mod event;
pub mod geometry;
pub mod gesture;
