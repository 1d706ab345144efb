//! The state machine that ties the viewport and the virtual pointer
//! together.
//!
//! [`Navigator`] owns the [`Viewport`] and reacts to [`Command`]s by
//! updating it and driving the pointer through a [`PointerDriver`].  It
//! tells the caller whether the overlay needs a redraw or whether the
//! session should end; it never touches the surface itself.

use crate::command::{Button, Command};
use crate::grid::Viewport;
use crate::pointer::{Extent, PointerDriver};
use crate::traits::VirtualPointer;
use log::{debug, info};

/// Default fraction of the viewport size a pan moves by.
pub const DEFAULT_PAN_STEP: f64 = 0.5;

/// Lifecycle of a navigation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Accepting commands.
    Active,
    /// A click or quit was handled; every further command is ignored.
    Terminating,
}

/// What the caller has to do after [`Navigator::handle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The viewport changed and the pointer moved; repaint the overlay.
    Redraw,
    /// The viewport is unchanged; nothing to repaint.
    Unchanged,
    /// Flush pending requests and stop dispatching.
    Terminate,
}

/// Orchestrates viewport changes and pointer events.
///
/// # Typical usage
///
/// ```ignore
/// let mut nav = Navigator::new(pointer, extent, DEFAULT_PAN_STEP);
/// nav.recenter();
/// match nav.handle(Command::Cut(Direction::Left)) {
///     Step::Redraw => draw(nav.viewport()),
///     Step::Terminate => running = false,
///     Step::Unchanged => {}
/// }
/// ```
pub struct Navigator<P: VirtualPointer> {
    driver: PointerDriver<P>,
    extent: Extent,
    viewport: Viewport,
    history: Vec<Viewport>,
    pan_step: f64,
    phase: Phase,
}

impl<P: VirtualPointer> Navigator<P> {
    /// Create a navigator over the full output.
    pub fn new(pointer: P, extent: Extent, pan_step: f64) -> Self {
        Self {
            driver: PointerDriver::new(pointer),
            extent,
            viewport: Viewport::FULL,
            history: Vec::new(),
            pan_step,
            phase: Phase::Active,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The pointer driver, mainly for inspection.
    pub fn driver(&self) -> &PointerDriver<P> {
        &self.driver
    }

    /// Update the output size the pointer maps onto.
    pub fn set_extent(&mut self, extent: Extent) {
        self.extent = extent;
    }

    /// Move the pointer to the current viewport center.
    ///
    /// Does nothing once the navigator is terminating.
    pub fn recenter(&self) {
        if self.phase == Phase::Active {
            self.driver.recenter(&self.viewport, self.extent);
        }
    }

    /// Process a single [`Command`].
    pub fn handle(&mut self, cmd: Command) -> Step {
        if self.phase == Phase::Terminating {
            debug!("ignoring {} while terminating", cmd);
            return Step::Unchanged;
        }

        match cmd {
            Command::Cut(dir) => {
                debug!("cut {}", dir);
                self.update(self.viewport.narrow(dir))
            }

            Command::Move(dir) => {
                debug!("move {}", dir);
                self.update(self.viewport.pan(dir, self.pan_step))
            }

            Command::Undo => match self.history.pop() {
                Some(previous) => {
                    debug!("undo");
                    self.viewport = previous;
                    self.recenter();
                    Step::Redraw
                }
                None => Step::Unchanged,
            },

            Command::Click(button) => {
                info!("{} click at {:?}", button, self.viewport.center());
                self.driver.recenter(&self.viewport, self.extent);
                self.driver.click(button);
                self.terminate()
            }

            Command::Press(button) => {
                self.driver.press(button);
                Step::Unchanged
            }

            Command::Release(button) => {
                self.driver.release(button);
                Step::Unchanged
            }

            Command::Scroll(dir) => {
                self.driver.scroll(dir);
                Step::Unchanged
            }

            Command::Quit => {
                info!("quit");
                self.terminate()
            }
        }
    }

    /// Process the commands bound to one key, in order.
    ///
    /// Returns [`Step::Terminate`] if any of them ended the session and
    /// [`Step::Redraw`] if any of them changed the viewport.
    pub fn handle_all(&mut self, cmds: &[Command]) -> Step {
        let mut step = Step::Unchanged;
        for &cmd in cmds {
            match self.handle(cmd) {
                Step::Terminate => return Step::Terminate,
                Step::Redraw => step = Step::Redraw,
                Step::Unchanged => {}
            }
        }
        step
    }

    /// Release every held button and stop accepting commands.
    fn terminate(&mut self) -> Step {
        for button in [Button::Left, Button::Right, Button::Middle] {
            if self.driver.release(button) {
                info!("released held {} button", button);
            }
        }
        self.phase = Phase::Terminating;
        Step::Terminate
    }

    fn update(&mut self, next: Viewport) -> Step {
        self.history.push(self.viewport);
        self.viewport = next;
        self.recenter();
        Step::Redraw
    }
}

//  Tests
