//! Core traits that decouple gridwarp's state machine and buffer pool from
//! the Wayland connection.
//!
//! Concrete implementations live in [`wayland`](crate::wayland); the
//! [`Navigator`](crate::navigator::Navigator) and
//! [`BufferPool`](crate::buffer::BufferPool) only depend on these
//! abstractions, so tests can drive them with recording doubles.

use crate::buffer::BufferId;

/// The button transition sent with [`VirtualPointer::button`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Pressed,
    Released,
}

/// A scroll axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Vertical,
    Horizontal,
}

/// What produced a scroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisSource {
    Wheel,
}

/// A virtual pointer device that accepts absolute motion and button events.
///
/// Events are grouped: nothing sent before [`frame`](VirtualPointer::frame)
/// is guaranteed to take effect.
pub trait VirtualPointer {
    /// Move to `(x, y)` within an area of `x_extent × y_extent`.
    fn motion_absolute(&self, time: u32, x: u32, y: u32, x_extent: u32, y_extent: u32);

    /// Press or release the evdev `button`.
    fn button(&self, time: u32, button: u32, state: ButtonState);

    /// Scroll along `axis` by `value` (in the units of `wl_pointer.axis`).
    fn axis(&self, time: u32, axis: Axis, value: f64);

    /// Name the device that produced the axis events of this group.
    fn axis_source(&self, source: AxisSource);

    /// Terminate the current group of events.
    fn frame(&self);
}

//  Buffer allocation

/// A pixel buffer handed out by a [`BufferAllocator`].
pub trait PoolBuffer {
    /// Width in device pixels.
    fn width(&self) -> u32;

    /// Height in device pixels.
    fn height(&self) -> u32;

    /// The ARGB8888 pixel storage, `width * 4 * height` bytes long.
    fn pixels_mut(&mut self) -> &mut [u8];
}

/// Creates the backing memory for pooled buffers.
///
/// Destroying a buffer is done by dropping it, so implementations release
/// any server-side object in [`Drop`].
pub trait BufferAllocator {
    /// The buffer type this allocator creates.
    type Buffer: PoolBuffer;

    /// The error produced when allocation fails.
    type Error: std::error::Error + 'static;

    /// Allocate a `width × height` ARGB8888 buffer.
    ///
    /// `id` is the handle the pool will use for this buffer; release
    /// notifications for it must be routed to
    /// [`BufferPool::release`](crate::buffer::BufferPool::release) with the
    /// same id.
    fn allocate(&mut self, id: BufferId, width: u32, height: u32)
        -> Result<Self::Buffer, Self::Error>;
}
