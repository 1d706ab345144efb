//! Virtual pointer sequencing.
//!
//! The [`PointerDriver`] turns a viewport into device coordinates on the
//! selected output and emits the virtual pointer events in the order the
//! protocol requires: every motion, every button transition and every
//! scroll step is closed by its own frame.

use crate::command::{Button, Direction};
use crate::grid::Viewport;
use crate::traits::{Axis, AxisSource, ButtonState, VirtualPointer};
use log::debug;
use std::collections::HashSet;
use std::time::Instant;

/// Axis distance of one wheel detent.
const SCROLL_STEP: f64 = 15.0;

/// Logical size of the output the pointer moves on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extent {
    pub width: u32,
    pub height: u32,
}

/// Drives a [`VirtualPointer`] to viewport centers and clicks there.
///
/// Buttons held down through [`press`](PointerDriver::press) are tracked so
/// a button is never pressed twice or released without being held.
pub struct PointerDriver<P: VirtualPointer> {
    pointer: P,
    epoch: Instant,
    held: HashSet<Button>,
}

impl<P: VirtualPointer> PointerDriver<P> {
    pub fn new(pointer: P) -> Self {
        Self {
            pointer,
            epoch: Instant::now(),
            held: HashSet::new(),
        }
    }

    /// Whether `button` is currently held down.
    pub fn is_held(&self, button: Button) -> bool {
        self.held.contains(&button)
    }

    /// The underlying pointer device.
    pub fn pointer(&self) -> &P {
        &self.pointer
    }

    /// Milliseconds since the driver was created, wrapping at `u32::MAX`.
    fn time(&self) -> u32 {
        self.epoch.elapsed().as_millis() as u32
    }

    /// Move the pointer to the center of `viewport` on an output of `extent`.
    ///
    /// A viewport panned off the output yields coordinates clamped to `0`
    /// on the negative side; the compositor clamps the positive side.
    pub fn recenter(&self, viewport: &Viewport, extent: Extent) {
        let center = viewport.center_on(extent.width, extent.height);
        // `as` saturates: negative and NaN become 0.
        let x = center.x as u32;
        let y = center.y as u32;
        debug!("pointer to ({}, {}) of {}x{}", x, y, extent.width, extent.height);
        self.pointer
            .motion_absolute(self.time(), x, y, extent.width, extent.height);
        self.pointer.frame();
    }

    /// Press and release `button` at the current position.
    pub fn click(&mut self, button: Button) {
        debug!("{} click", button);
        self.press(button);
        self.release(button);
    }

    /// Hold `button` down.  Returns `false`, sending nothing, if it is
    /// already held.
    pub fn press(&mut self, button: Button) -> bool {
        if !self.held.insert(button) {
            debug!("{} already held", button);
            return false;
        }
        self.pointer
            .button(self.time(), button.code(), ButtonState::Pressed);
        self.pointer.frame();
        true
    }

    /// Let go of `button`.  Returns `false`, sending nothing, if it is not
    /// held.
    pub fn release(&mut self, button: Button) -> bool {
        if !self.held.remove(&button) {
            debug!("{} not held", button);
            return false;
        }
        self.pointer
            .button(self.time(), button.code(), ButtonState::Released);
        self.pointer.frame();
        true
    }

    /// Scroll one wheel step towards `direction`.
    pub fn scroll(&self, direction: Direction) {
        let (axis, value) = match direction {
            Direction::Up => (Axis::Vertical, -SCROLL_STEP),
            Direction::Down => (Axis::Vertical, SCROLL_STEP),
            Direction::Left => (Axis::Horizontal, -SCROLL_STEP),
            Direction::Right => (Axis::Horizontal, SCROLL_STEP),
        };
        debug!("scroll {}", direction);
        self.pointer.axis(self.time(), axis, value);
        self.pointer.axis_source(AxisSource::Wheel);
        self.pointer.frame();
    }
}

//  Tests

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;

    /// One recorded pointer event.
    #[derive(Debug, Clone, PartialEq)]
    pub(crate) enum Event {
        Motion { x: u32, y: u32, w: u32, h: u32 },
        Button { code: u32, state: ButtonState },
        Axis { axis: Axis, value: f64 },
        AxisSource(AxisSource),
        Frame,
    }

    /// A test double that records every pointer event in order.
    #[derive(Debug, Default)]
    pub(crate) struct RecorderPointer {
        pub(crate) events: RefCell<Vec<Event>>,
    }

    impl VirtualPointer for RecorderPointer {
        fn motion_absolute(&self, _: u32, x: u32, y: u32, w: u32, h: u32) {
            self.events
                .borrow_mut()
                .push(Event::Motion { x, y, w, h });
        }

        fn button(&self, _: u32, code: u32, state: ButtonState) {
            self.events.borrow_mut().push(Event::Button { code, state });
        }

        fn axis(&self, _: u32, axis: Axis, value: f64) {
            self.events.borrow_mut().push(Event::Axis { axis, value });
        }

        fn axis_source(&self, source: AxisSource) {
            self.events.borrow_mut().push(Event::AxisSource(source));
        }

        fn frame(&self) {
            self.events.borrow_mut().push(Event::Frame);
        }
    }

    const FHD: Extent = Extent {
        width: 1920,
        height: 1080,
    };

    #[test]
    fn recenter_full_viewport_hits_middle() {
        let d = PointerDriver::new(RecorderPointer::default());
        d.recenter(&Viewport::FULL, FHD);
        assert_eq!(
            *d.pointer().events.borrow(),
            vec![
                Event::Motion {
                    x: 960,
                    y: 540,
                    w: 1920,
                    h: 1080
                },
                Event::Frame,
            ]
        );
    }

    #[test]
    fn recenter_narrowed_viewport() {
        let d = PointerDriver::new(RecorderPointer::default());
        let v = Viewport::FULL
            .narrow(Direction::Left)
            .narrow(Direction::Right);
        d.recenter(&v, FHD);
        // x = 1920 * (0.25 + 0.125)
        assert_eq!(
            d.pointer().events.borrow()[0],
            Event::Motion {
                x: 720,
                y: 540,
                w: 1920,
                h: 1080
            }
        );
    }

    #[test]
    fn recenter_off_screen_clamps_to_zero() {
        let d = PointerDriver::new(RecorderPointer::default());
        let v = Viewport::FULL
            .narrow(Direction::Left)
            .pan(Direction::Left, 2.0);
        d.recenter(&v, FHD);
        assert_eq!(
            d.pointer().events.borrow()[0],
            Event::Motion {
                x: 0,
                y: 540,
                w: 1920,
                h: 1080
            }
        );
    }

    #[test]
    fn click_sequence_is_press_frame_release_frame() {
        let mut d = PointerDriver::new(RecorderPointer::default());
        d.click(Button::Right);
        assert_eq!(
            *d.pointer().events.borrow(),
            vec![
                Event::Button {
                    code: 0x111,
                    state: ButtonState::Pressed
                },
                Event::Frame,
                Event::Button {
                    code: 0x111,
                    state: ButtonState::Released
                },
                Event::Frame,
            ]
        );
    }

    fn press(code: u32) -> Event {
        Event::Button {
            code,
            state: ButtonState::Pressed,
        }
    }

    fn release(code: u32) -> Event {
        Event::Button {
            code,
            state: ButtonState::Released,
        }
    }

    #[test]
    fn press_and_release_are_tracked() {
        let mut d = PointerDriver::new(RecorderPointer::default());
        assert!(d.press(Button::Left));
        assert!(d.is_held(Button::Left));
        assert!(!d.press(Button::Left));
        assert!(d.release(Button::Left));
        assert!(!d.is_held(Button::Left));
        assert!(!d.release(Button::Left));
        assert_eq!(
            *d.pointer().events.borrow(),
            vec![press(0x110), Event::Frame, release(0x110), Event::Frame]
        );
    }

    #[test]
    fn release_without_press_sends_nothing() {
        let mut d = PointerDriver::new(RecorderPointer::default());
        assert!(!d.release(Button::Middle));
        assert!(d.pointer().events.borrow().is_empty());
    }

    #[test]
    fn click_while_held_only_releases() {
        let mut d = PointerDriver::new(RecorderPointer::default());
        d.press(Button::Left);
        d.click(Button::Left);
        assert!(!d.is_held(Button::Left));
        assert_eq!(
            *d.pointer().events.borrow(),
            vec![press(0x110), Event::Frame, release(0x110), Event::Frame]
        );
    }

    #[test]
    fn scroll_sends_axis_source_and_frame() {
        let d = PointerDriver::new(RecorderPointer::default());
        d.scroll(Direction::Up);
        d.scroll(Direction::Right);
        assert_eq!(
            *d.pointer().events.borrow(),
            vec![
                Event::Axis {
                    axis: Axis::Vertical,
                    value: -15.0
                },
                Event::AxisSource(AxisSource::Wheel),
                Event::Frame,
                Event::Axis {
                    axis: Axis::Horizontal,
                    value: 15.0
                },
                Event::AxisSource(AxisSource::Wheel),
                Event::Frame,
            ]
        );
    }
}
