use super::session::Session;
use crate::output::OutputGeometry;
use log::debug;
use wayland_client::protocol::wl_output::{self, WlOutput};
use wayland_client::protocol::wl_registry::WlRegistry;
use wayland_client::{Connection, Dispatch, QueueHandle};
use wayland_protocols::xdg::xdg_output::zv1::client::zxdg_output_v1::{self, ZxdgOutputV1};

/// Index of an output in [`Session::outputs`].  Outputs are never removed,
/// so the index stays valid for the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct OutputId(pub(super) usize);

/// An announced output.
pub(super) struct Output {
    pub(super) wl: WlOutput,
    pub(super) xdg: Option<ZxdgOutputV1>,
    pub(super) geometry: OutputGeometry,
}

/// Repeatable constructor for `wl_output`.
pub(super) fn add_output(
    state: &mut Session,
    registry: &WlRegistry,
    name: u32,
    version: u32,
    qh: &QueueHandle<Session>,
) {
    let id = OutputId(state.outputs.len());
    let wl = registry.bind(name, version, qh, id);
    state.outputs.push(Output {
        wl,
        xdg: None,
        geometry: OutputGeometry::default(),
    });
    if state.have_all_globals {
        state.request_output_details(id, qh);
    }
}

impl Session {
    /// Ask for the name and logical size of an output.
    pub(super) fn request_output_details(&mut self, id: OutputId, qh: &QueueHandle<Session>) {
        let (Some(manager), Some(output)) = (self.output_manager.as_ref(), self.outputs.get_mut(id.0))
        else {
            return;
        };
        if output.xdg.is_none() {
            output.xdg = Some(manager.get_xdg_output(&output.wl, qh, id));
        }
    }

    /// Called after an output's geometry changed.
    fn output_changed(&mut self, id: OutputId) {
        let Some(extent) = self.outputs.get(id.0).map(|o| o.geometry.extent()) else {
            return;
        };
        let redraw = match self.overlay.as_mut() {
            Some(overlay) if overlay.output == id => {
                overlay.navigator.set_extent(extent);
                overlay.is_configured()
            }
            _ => false,
        };
        if redraw {
            if let Err(e) = self.draw() {
                self.fail(e);
            }
        }
    }
}

impl Dispatch<WlOutput, OutputId> for Session {
    fn event(
        state: &mut Self,
        _: &WlOutput,
        event: wl_output::Event,
        id: &OutputId,
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        match event {
            wl_output::Event::Scale { factor } => {
                if let Some(output) = state.outputs.get_mut(id.0) {
                    output.geometry.set_scale(factor);
                }
            }
            wl_output::Event::Done => state.output_changed(*id),
            _ => {}
        }
    }
}

impl Dispatch<ZxdgOutputV1, OutputId> for Session {
    fn event(
        state: &mut Self,
        _: &ZxdgOutputV1,
        event: zxdg_output_v1::Event,
        id: &OutputId,
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        let Some(output) = state.outputs.get_mut(id.0) else {
            return;
        };
        match event {
            zxdg_output_v1::Event::LogicalSize { width, height } => {
                output.geometry.width = width;
                output.geometry.height = height;
            }
            zxdg_output_v1::Event::Name { name } => {
                debug!("output {} is {}", id.0, name);
                output.geometry.name = Some(name);
            }
            _ => {}
        }
    }
}
