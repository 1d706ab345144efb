//! **gridwarp**: keyboard-driven pointer warping for Wayland.
//!
//! gridwarp shows a grid over one output and moves a virtual pointer to the
//! center of a shrinking region as keys are pressed.  Each cut halves the
//! region; a click key presses a pointer button there and exits.
//!
//! # Architecture
//!
//! The core is independent of the display server:
//!
//! * [`grid::Viewport`] is the region, in fractions of the output.
//! * [`navigator::Navigator`] turns [`command::Command`]s into viewport
//!   changes and pointer events.
//! * [`render`] paints the grid into a pixel buffer taken from a
//!   [`buffer::BufferPool`].
//!
//! Two traits form the seam to the compositor:
//!
//! * [`traits::VirtualPointer`] abstracts the pointer device.
//! * [`traits::BufferAllocator`] abstracts shared-memory buffers.
//!
//! The implementations, together with global discovery, output selection
//! and keyboard handling, live in [`wayland`].

pub mod binder;
pub mod buffer;
pub mod command;
pub mod config;
pub mod grid;
pub mod keyboard;
pub mod navigator;
pub mod output;
pub mod pointer;
pub mod render;
pub mod traits;
pub mod wayland;
