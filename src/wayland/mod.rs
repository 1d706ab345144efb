//! Wayland backend.
//!
//! Everything that speaks the Wayland protocol lives here; the rest of the
//! crate only sees the [`VirtualPointer`](crate::traits::VirtualPointer) and
//! [`BufferAllocator`](crate::traits::BufferAllocator) traits.
//!
//! A session goes through three phases:
//!
//! 1. **Discovery.**  The registry announces globals; each is looked up in
//!    the [`GLOBALS`](globals::GLOBALS) table and bound.  After the first
//!    roundtrip every singleton must be present.
//! 2. **Output details.**  Each output gets an extended output object so its
//!    name and logical size arrive; a second roundtrip collects them and the
//!    target output is selected.
//! 3. **Overlay.**  A fullscreen layer surface with an empty input region
//!    and a virtual pointer are created on the selected output.  Key presses
//!    drive the [`Navigator`](crate::navigator::Navigator) until it asks to
//!    terminate or the compositor closes the surface.

mod globals;
mod output;
mod pointer;
mod seat;
mod session;
mod shm;

pub use session::{run, SessionError};
pub use shm::ShmError;
