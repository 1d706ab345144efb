use crate::traits::{Axis, AxisSource, ButtonState, VirtualPointer};
use wayland_client::protocol::wl_pointer;
use wayland_protocols_wlr::virtual_pointer::v1::client::zwlr_virtual_pointer_v1::ZwlrVirtualPointerV1;

impl VirtualPointer for ZwlrVirtualPointerV1 {
    fn motion_absolute(&self, time: u32, x: u32, y: u32, x_extent: u32, y_extent: u32) {
        ZwlrVirtualPointerV1::motion_absolute(self, time, x, y, x_extent, y_extent);
    }

    fn button(&self, time: u32, button: u32, state: ButtonState) {
        let state = match state {
            ButtonState::Pressed => wl_pointer::ButtonState::Pressed,
            ButtonState::Released => wl_pointer::ButtonState::Released,
        };
        ZwlrVirtualPointerV1::button(self, time, button, state);
    }

    fn axis(&self, time: u32, axis: Axis, value: f64) {
        let axis = match axis {
            Axis::Vertical => wl_pointer::Axis::VerticalScroll,
            Axis::Horizontal => wl_pointer::Axis::HorizontalScroll,
        };
        ZwlrVirtualPointerV1::axis(self, time, axis, value);
    }

    fn axis_source(&self, source: AxisSource) {
        let source = match source {
            AxisSource::Wheel => wl_pointer::AxisSource::Wheel,
        };
        ZwlrVirtualPointerV1::axis_source(self, source);
    }

    fn frame(&self) {
        ZwlrVirtualPointerV1::frame(self);
    }
}
