//! expcurve: level experience curves for games
//!
//! Loads per-game level experience documents and derives what a renderer
//! needs from them: the sunburst range hierarchy, per-column statistics,
//! the graded data table and chart options.
//!
//! Layers, inner to outer: [`domain`] (pure computations), [`application`]
//! (services over I/O traits), [`infrastructure`] (real I/O and wiring),
//! [`cli`] (the `expcurve` binary).

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
