//! Output geometry and selection.
//!
//! Outputs are announced during global discovery, but their names and
//! logical sizes only arrive through the extended output geometry object,
//! which can be requested once the output manager itself is bound.  The
//! [`OutputGeometry`] collects what has arrived so far; [`select_output`]
//! picks the output the overlay goes on.

use crate::pointer::Extent;
use log::{info, warn};

/// What is known about one output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputGeometry {
    /// Connector name, e.g. `"DP-1"`.
    pub name: Option<String>,
    /// Integer scale factor, at least 1.
    pub scale_factor: i32,
    /// Logical width in logical pixels.
    pub width: i32,
    /// Logical height in logical pixels.
    pub height: i32,
}

impl Default for OutputGeometry {
    fn default() -> Self {
        Self {
            name: None,
            scale_factor: 1,
            width: 0,
            height: 0,
        }
    }
}

impl OutputGeometry {
    /// Record a `wl_output.scale` event.  Values below 1 are ignored.
    pub fn set_scale(&mut self, factor: i32) {
        if factor < 1 {
            warn!("ignoring invalid scale factor {}", factor);
            return;
        }
        self.scale_factor = factor;
    }

    /// The logical size as a pointer extent.  Negative sizes become 0.
    pub fn extent(&self) -> Extent {
        Extent {
            width: self.width.max(0) as u32,
            height: self.height.max(0) as u32,
        }
    }

    /// Name for log messages.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }
}

/// Errors from choosing an output.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectError {
    #[error("output {0} doesn't exist")]
    NoSuchOutput(String),
    #[error("compositor announced no outputs")]
    NoOutputs,
}

/// Pick the output to show the overlay on.
///
/// With a `target` name, only an output of exactly that name is accepted.
/// Without one, the first announced output is used.  Returns the index into
/// `outputs`.
pub fn select_output<'a, I>(outputs: I, target: Option<&str>) -> Result<usize, SelectError>
where
    I: IntoIterator<Item = &'a OutputGeometry>,
{
    let mut iter = outputs.into_iter().enumerate().peekable();
    if iter.peek().is_none() {
        return Err(SelectError::NoOutputs);
    }
    match target {
        Some(target) => iter
            .find(|(_, o)| o.name.as_deref() == Some(target))
            .map(|(i, o)| {
                info!("using output {} ({}x{}, scale {})", target, o.width, o.height, o.scale_factor);
                i
            })
            .ok_or_else(|| SelectError::NoSuchOutput(target.to_string())),
        None => iter
            .next()
            .map(|(i, o)| {
                info!("no output configured, using first output {}", o.display_name());
                i
            })
            .ok_or(SelectError::NoOutputs),
    }
}

//  Tests
