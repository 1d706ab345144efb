//! `wl_shm` buffers backed by anonymous memory files.

use super::session::Session;
use crate::buffer::{buffer_size, BufferId};
use crate::traits::{BufferAllocator, PoolBuffer};
use memmap2::{MmapMut, MmapOptions};
use rustix::fs::{ftruncate, memfd_create, MemfdFlags};
use std::fs::File;
use std::os::fd::AsFd;
use wayland_client::protocol::wl_buffer::{self, WlBuffer};
use wayland_client::protocol::wl_shm::{self, WlShm};
use wayland_client::{Connection, Dispatch, QueueHandle};

/// Errors from creating a shared-memory buffer.
#[derive(Debug, thiserror::Error)]
pub enum ShmError {
    #[error("failed to create memory file: {0}")]
    Memfd(#[from] rustix::io::Errno),
    #[error("failed to map memory file: {0}")]
    Map(#[from] std::io::Error),
    #[error("{width}x{height} buffer is too large")]
    TooLarge { width: u32, height: u32 },
}

/// Allocates one memory file and one `wl_buffer` per pooled buffer.
pub(super) struct ShmAllocator {
    shm: WlShm,
    qh: QueueHandle<Session>,
}

impl ShmAllocator {
    pub(super) fn new(shm: WlShm, qh: QueueHandle<Session>) -> Self {
        Self { shm, qh }
    }
}

impl BufferAllocator for ShmAllocator {
    type Buffer = ShmBuffer;
    type Error = ShmError;

    fn allocate(&mut self, id: BufferId, width: u32, height: u32) -> Result<ShmBuffer, ShmError> {
        let size = buffer_size(width, height);
        let too_large = || ShmError::TooLarge { width, height };
        let pool_size = i32::try_from(size).map_err(|_| too_large())?;
        let stride = width
            .checked_mul(4)
            .and_then(|s| i32::try_from(s).ok())
            .ok_or_else(too_large)?;

        let fd = memfd_create("gridwarp", MemfdFlags::CLOEXEC)?;
        ftruncate(&fd, size as u64)?;
        let file = File::from(fd);
        // SAFETY: the file is private to this process and the compositor,
        // and the compositor only reads it.
        let map = unsafe { MmapOptions::new().len(size).map_mut(&file)? };

        let pool = self.shm.create_pool(file.as_fd(), pool_size, &self.qh, ());
        let wl = pool.create_buffer(
            0,
            width as i32,
            height as i32,
            stride,
            wl_shm::Format::Argb8888,
            &self.qh,
            id,
        );
        pool.destroy();

        Ok(ShmBuffer {
            wl,
            map,
            width,
            height,
        })
    }
}

/// A mapped ARGB8888 buffer and its protocol object.
pub(super) struct ShmBuffer {
    wl: WlBuffer,
    map: MmapMut,
    width: u32,
    height: u32,
}

impl ShmBuffer {
    pub(super) fn wl_buffer(&self) -> &WlBuffer {
        &self.wl
    }
}

impl PoolBuffer for ShmBuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.map
    }
}

impl Drop for ShmBuffer {
    fn drop(&mut self) {
        self.wl.destroy();
    }
}

impl Dispatch<WlBuffer, BufferId> for Session {
    fn event(
        state: &mut Self,
        _: &WlBuffer,
        event: wl_buffer::Event,
        id: &BufferId,
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        if let wl_buffer::Event::Release = event {
            if let Some(overlay) = state.overlay.as_mut() {
                overlay.pool.release(*id);
            }
        }
    }
}
