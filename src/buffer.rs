//! Shared-memory buffer pool.
//!
//! The [`BufferPool`] owns every pixel buffer the overlay draws into.  A
//! buffer is lent to the renderer from [`acquire`](BufferPool::acquire)
//! until the compositor sends its release notification, which is routed to
//! [`release`](BufferPool::release).  Released buffers are kept for reuse;
//! buffers whose size no longer matches are dropped lazily on the next
//! acquire.  [`acquire_filled`](BufferPool::acquire_filled) hands a buffer
//! back to the pool at once when drawing into it fails.

use crate::traits::{BufferAllocator, PoolBuffer};
use log::debug;
use std::fmt;

/// Stable handle for a pooled buffer.
///
/// Ids are never reused within one pool, so a late release notification for
/// a dropped buffer cannot free a different one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(u32);

impl fmt::Display for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Bytes needed for an ARGB8888 buffer of `width × height`.
pub fn buffer_size(width: u32, height: u32) -> usize {
    width as usize * 4 * height as usize
}

struct Entry<B> {
    id: BufferId,
    buffer: B,
    in_use: bool,
}

/// A pool of reusable pixel buffers keyed by size.
pub struct BufferPool<A: BufferAllocator> {
    allocator: A,
    entries: Vec<Entry<A::Buffer>>,
    next_id: u32,
}

impl<A: BufferAllocator> BufferPool<A> {
    /// Create an empty pool that allocates through `allocator`.
    pub fn new(allocator: A) -> Self {
        Self {
            allocator,
            entries: Vec::new(),
            next_id: 0,
        }
    }

    /// Return a free `width × height` buffer and mark it in use.
    ///
    /// Buffers still held by the compositor are skipped.  Free buffers of a
    /// different size are dropped on the way.  If no free buffer matches, a
    /// new one is allocated.
    pub fn acquire(&mut self, width: u32, height: u32) -> Result<BufferId, A::Error> {
        let mut found = None;
        let mut i = 0;
        while i < self.entries.len() {
            let entry = &self.entries[i];
            if entry.in_use {
                i += 1;
                continue;
            }
            if entry.buffer.width() != width || entry.buffer.height() != height {
                let stale = self.entries.remove(i);
                debug!(
                    "dropping stale {}x{} buffer {}",
                    stale.buffer.width(),
                    stale.buffer.height(),
                    stale.id
                );
                continue;
            }
            found = Some(i);
            break;
        }

        let index = match found {
            Some(index) => index,
            None => {
                let id = BufferId(self.next_id);
                let buffer = self.allocator.allocate(id, width, height)?;
                self.next_id += 1;
                debug!("allocated {}x{} buffer {}", width, height, id);
                self.entries.push(Entry {
                    id,
                    buffer,
                    in_use: false,
                });
                self.entries.len() - 1
            }
        };

        let entry = &mut self.entries[index];
        entry.in_use = true;
        Ok(entry.id)
    }

    /// Acquire a `width × height` buffer and run `fill` on it.
    ///
    /// If `fill` fails the buffer is released before the error is returned,
    /// so a failed draw never leaves a buffer lent out.
    pub fn acquire_filled<E, F>(&mut self, width: u32, height: u32, fill: F) -> Result<BufferId, E>
    where
        E: From<A::Error>,
        F: FnOnce(&mut A::Buffer) -> Result<(), E>,
    {
        let id = self.acquire(width, height)?;
        let filled = match self.get_mut(id) {
            Some(buffer) => fill(buffer),
            None => Ok(()),
        };
        if let Err(e) = filled {
            debug!("fill failed, releasing buffer {}", id);
            self.release(id);
            return Err(e);
        }
        Ok(id)
    }

    /// Mark `id` as no longer read by the compositor.
    ///
    /// The buffer stays in the pool.  Unknown ids are ignored.
    pub fn release(&mut self, id: BufferId) {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => entry.in_use = false,
            None => debug!("release for unknown buffer {}", id),
        }
    }

    /// Look up a pooled buffer.
    pub fn get(&self, id: BufferId) -> Option<&A::Buffer> {
        self.entries.iter().find(|e| e.id == id).map(|e| &e.buffer)
    }

    /// Look up a pooled buffer for writing.
    pub fn get_mut(&mut self, id: BufferId) -> Option<&mut A::Buffer> {
        self.entries
            .iter_mut()
            .find(|e| e.id == id)
            .map(|e| &mut e.buffer)
    }

    /// Whether `id` is currently lent out.
    pub fn is_in_use(&self, id: BufferId) -> bool {
        self.entries.iter().any(|e| e.id == id && e.in_use)
    }

    /// Number of buffers held by the pool, in use or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the pool holds no buffers.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//  Tests
