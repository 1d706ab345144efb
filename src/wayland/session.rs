use super::globals::GLOBALS;
use super::output::{Output, OutputId};
use super::seat::{Seat, SeatId};
use super::shm::{ShmAllocator, ShmError};
use crate::binder::{missing_singleton, Slot};
use crate::buffer::BufferPool;
use crate::config::Config;
use crate::keyboard::Bindings;
use crate::navigator::{Navigator, Step};
use crate::output::{select_output, SelectError};
use crate::render::{self, RenderError, Style};
use crate::traits::PoolBuffer;
use log::{debug, info};
use wayland_client::backend::WaylandError;
use wayland_client::protocol::wl_compositor::WlCompositor;
use wayland_client::protocol::wl_region::WlRegion;
use wayland_client::protocol::wl_registry::WlRegistry;
use wayland_client::protocol::wl_shm::WlShm;
use wayland_client::protocol::wl_shm_pool::WlShmPool;
use wayland_client::protocol::wl_surface::WlSurface;
use wayland_client::{
    delegate_noop, ConnectError, Connection, Dispatch, DispatchError, QueueHandle,
};
use wayland_protocols::xdg::xdg_output::zv1::client::zxdg_output_manager_v1::ZxdgOutputManagerV1;
use wayland_protocols_wlr::layer_shell::v1::client::zwlr_layer_shell_v1::{
    Layer, ZwlrLayerShellV1,
};
use wayland_protocols_wlr::layer_shell::v1::client::zwlr_layer_surface_v1::{
    self, Anchor, KeyboardInteractivity, ZwlrLayerSurfaceV1,
};
use wayland_protocols_wlr::virtual_pointer::v1::client::zwlr_virtual_pointer_manager_v1::ZwlrVirtualPointerManagerV1;
use wayland_protocols_wlr::virtual_pointer::v1::client::zwlr_virtual_pointer_v1::ZwlrVirtualPointerV1;
use xkbcommon::xkb;

/// Layer-shell namespace of the overlay surface.
const NAMESPACE: &str = "gridwarp";

/// Fatal session errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("failed to connect to the Wayland display: {0}")]
    Connect(#[from] ConnectError),
    #[error("Wayland dispatch failed: {0}")]
    Dispatch(#[from] DispatchError),
    #[error("Wayland connection failed: {0}")]
    Connection(#[from] WaylandError),
    #[error("compositor does not support {0}")]
    MissingGlobal(&'static str),
    #[error(transparent)]
    Select(#[from] SelectError),
    #[error("buffer allocation failed: {0}")]
    Shm(#[from] ShmError),
    #[error("drawing failed: {0}")]
    Render(#[from] RenderError),
}

/// The surface, pointer and buffers on the selected output.
pub(super) struct Overlay {
    pub(super) output: OutputId,
    surface: WlSurface,
    // Kept alive for as long as the surface is shown.
    _layer_surface: ZwlrLayerSurfaceV1,
    pub(super) pool: BufferPool<ShmAllocator>,
    pub(super) navigator: Navigator<ZwlrVirtualPointerV1>,
    /// Logical size from the last configure; `None` until the first one.
    size: Option<(u32, u32)>,
}

impl Overlay {
    pub(super) fn is_configured(&self) -> bool {
        self.size.is_some()
    }
}

/// All client-side state of a connection.
pub struct Session {
    pub(super) running: bool,
    pub(super) have_all_globals: bool,
    compositor: Option<WlCompositor>,
    shm: Option<WlShm>,
    layer_shell: Option<ZwlrLayerShellV1>,
    pointer_manager: Option<ZwlrVirtualPointerManagerV1>,
    pub(super) output_manager: Option<ZxdgOutputManagerV1>,
    pub(super) outputs: Vec<Output>,
    pub(super) seats: Vec<Seat>,
    pub(super) xkb: xkb::Context,
    pub(super) overlay: Option<Overlay>,
    bindings: Bindings,
    style: Style,
    target_output: Option<String>,
    pan_step: f64,
    error: Option<SessionError>,
}

impl Session {
    fn new(config: &Config) -> Self {
        Self {
            running: true,
            have_all_globals: false,
            compositor: None,
            shm: None,
            layer_shell: None,
            pointer_manager: None,
            output_manager: None,
            outputs: Vec::new(),
            seats: Vec::new(),
            xkb: xkb::Context::new(xkb::CONTEXT_NO_FLAGS),
            overlay: None,
            bindings: config.bindings().clone(),
            style: config.style(),
            target_output: config.output.clone(),
            pan_step: config.pan_step,
            error: None,
        }
    }

    pub(super) fn is_bound(&self, slot: Slot) -> bool {
        match slot {
            Slot::Compositor => self.compositor.is_some(),
            Slot::Shm => self.shm.is_some(),
            Slot::LayerShell => self.layer_shell.is_some(),
            Slot::VirtualPointerManager => self.pointer_manager.is_some(),
            Slot::OutputManager => self.output_manager.is_some(),
        }
    }

    /// Bind a singleton global into its empty slot.
    pub(super) fn bind_singleton(
        &mut self,
        slot: Slot,
        registry: &WlRegistry,
        name: u32,
        version: u32,
        qh: &QueueHandle<Session>,
    ) {
        match slot {
            Slot::Compositor => self.compositor = Some(registry.bind(name, version, qh, ())),
            Slot::Shm => self.shm = Some(registry.bind(name, version, qh, ())),
            Slot::LayerShell => self.layer_shell = Some(registry.bind(name, version, qh, ())),
            Slot::VirtualPointerManager => {
                self.pointer_manager = Some(registry.bind(name, version, qh, ()))
            }
            Slot::OutputManager => {
                self.output_manager = Some(registry.bind(name, version, qh, ()))
            }
        }
    }

    /// Record a fatal error and stop dispatching.
    pub(super) fn fail(&mut self, error: SessionError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
        self.running = false;
    }

    /// Create the layer surface and virtual pointer on `output`.
    fn create_overlay(&mut self, output: OutputId, qh: &QueueHandle<Session>) -> Result<(), SessionError> {
        // Discovery already checked these; the lookups only unwrap.
        let compositor = self
            .compositor
            .as_ref()
            .ok_or(SessionError::MissingGlobal("wl_compositor"))?;
        let shm = self
            .shm
            .as_ref()
            .ok_or(SessionError::MissingGlobal("wl_shm"))?;
        let layer_shell = self
            .layer_shell
            .as_ref()
            .ok_or(SessionError::MissingGlobal("zwlr_layer_shell_v1"))?;
        let pointer_manager = self
            .pointer_manager
            .as_ref()
            .ok_or(SessionError::MissingGlobal("zwlr_virtual_pointer_manager_v1"))?;
        let target = self
            .outputs
            .get(output.0)
            .ok_or(SessionError::Select(SelectError::NoOutputs))?;

        let surface = compositor.create_surface(qh, ());
        // Pointer input passes through to whatever is below the overlay.
        let region = compositor.create_region(qh, ());
        surface.set_input_region(Some(&region));
        region.destroy();

        let layer_surface = layer_shell.get_layer_surface(
            &surface,
            Some(&target.wl),
            Layer::Overlay,
            NAMESPACE.into(),
            qh,
            (),
        );
        layer_surface.set_size(0, 0);
        layer_surface.set_anchor(Anchor::all());
        layer_surface.set_exclusive_zone(-1);
        layer_surface.set_keyboard_interactivity(KeyboardInteractivity::Exclusive);
        surface.commit();

        let pointer =
            pointer_manager.create_virtual_pointer_with_output(None, Some(&target.wl), qh, ());
        let navigator = Navigator::new(pointer, target.geometry.extent(), self.pan_step);
        let pool = BufferPool::new(ShmAllocator::new(shm.clone(), qh.clone()));

        info!(
            "overlay on {} ({}x{})",
            target.geometry.display_name(),
            target.geometry.width,
            target.geometry.height
        );
        self.overlay = Some(Overlay {
            output,
            surface,
            _layer_surface: layer_surface,
            pool,
            navigator,
            size: None,
        });
        Ok(())
    }

    /// Handle a layer surface configure.
    fn configure(&mut self, width: u32, height: u32) {
        let Some(overlay) = self.overlay.as_mut() else {
            return;
        };
        let first = overlay.size.is_none();
        overlay.size = Some((width, height));
        debug!("configured {}x{}", width, height);
        if first {
            overlay.navigator.recenter();
        }
        if let Err(e) = self.draw() {
            self.fail(e);
        }
    }

    /// Paint the grid for the current viewport into a free buffer and
    /// commit it.
    pub(super) fn draw(&mut self) -> Result<(), SessionError> {
        let Some(overlay) = self.overlay.as_mut() else {
            return Ok(());
        };
        let Some((width, height)) = overlay.size else {
            return Ok(());
        };
        let scale = self
            .outputs
            .get(overlay.output.0)
            .map_or(1, |o| o.geometry.scale_factor);
        let buffer_width = width * scale as u32;
        let buffer_height = height * scale as u32;
        if buffer_width == 0 || buffer_height == 0 {
            debug!("zero-sized overlay, not drawing");
            return Ok(());
        }

        let viewport = overlay.navigator.viewport();
        let style = &self.style;
        let id = overlay
            .pool
            .acquire_filled(buffer_width, buffer_height, |buffer| {
                render::paint(
                    buffer.pixels_mut(),
                    buffer_width,
                    buffer_height,
                    scale,
                    &viewport,
                    style,
                )
                .map_err(SessionError::from)
            })?;
        let Some(buffer) = overlay.pool.get(id) else {
            return Ok(());
        };

        let surface = &overlay.surface;
        surface.set_buffer_scale(scale);
        surface.attach(Some(buffer.wl_buffer()), 0, 0);
        surface.damage_buffer(0, 0, buffer_width as i32, buffer_height as i32);
        surface.commit();
        Ok(())
    }

    /// Handle a key press on `seat`.
    pub(super) fn key_pressed(&mut self, seat: SeatId, key: u32) {
        let Some(combo) = self.seats.get(seat.0).and_then(|s| s.state.key(key)) else {
            return;
        };
        let Some(commands) = self.bindings.lookup(combo) else {
            debug!("{} is not bound", combo);
            return;
        };
        let Some(overlay) = self.overlay.as_mut() else {
            return;
        };
        match overlay.navigator.handle_all(commands) {
            Step::Redraw => {
                if let Err(e) = self.draw() {
                    self.fail(e);
                }
            }
            Step::Terminate => self.running = false,
            Step::Unchanged => {}
        }
    }
}

/// Connect to the compositor, show the overlay and run until the user
/// clicks or quits.
pub fn run(config: &Config) -> Result<(), SessionError> {
    let conn = Connection::connect_to_env()?;
    let mut queue = conn.new_event_queue();
    let qh = queue.handle();
    conn.display().get_registry(&qh, ());

    let mut session = Session::new(config);
    queue.roundtrip(&mut session)?;
    if let Some(name) = missing_singleton(GLOBALS, |slot| session.is_bound(slot)) {
        return Err(SessionError::MissingGlobal(name));
    }
    info!(
        "found {} output(s), {} seat(s)",
        session.outputs.len(),
        session.seats.len()
    );

    session.have_all_globals = true;
    for i in 0..session.outputs.len() {
        session.request_output_details(OutputId(i), &qh);
    }
    queue.roundtrip(&mut session)?;

    let index = select_output(
        session.outputs.iter().map(|o| &o.geometry),
        session.target_output.as_deref(),
    )?;
    session.create_overlay(OutputId(index), &qh)?;
    queue.roundtrip(&mut session)?;

    while session.running {
        queue.blocking_dispatch(&mut session)?;
    }
    // The click may still sit in the outgoing buffer.
    conn.flush()?;

    match session.error.take() {
        Some(e) => Err(e),
        None => {
            info!("done");
            Ok(())
        }
    }
}

impl Dispatch<ZwlrLayerSurfaceV1, ()> for Session {
    fn event(
        state: &mut Self,
        layer_surface: &ZwlrLayerSurfaceV1,
        event: zwlr_layer_surface_v1::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        match event {
            zwlr_layer_surface_v1::Event::Configure {
                serial,
                width,
                height,
            } => {
                layer_surface.ack_configure(serial);
                state.configure(width, height);
            }
            zwlr_layer_surface_v1::Event::Closed => {
                info!("overlay closed by the compositor");
                state.running = false;
            }
            _ => {}
        }
    }
}

delegate_noop!(Session: WlCompositor);
delegate_noop!(Session: WlRegion);
delegate_noop!(Session: WlShmPool);
delegate_noop!(Session: ZwlrLayerShellV1);
delegate_noop!(Session: ZwlrVirtualPointerManagerV1);
delegate_noop!(Session: ZwlrVirtualPointerV1);
delegate_noop!(Session: ZxdgOutputManagerV1);
delegate_noop!(Session: ignore WlShm);
delegate_noop!(Session: ignore WlSurface);
