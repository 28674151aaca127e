//! Scrawl rendering pipeline.
//!
//! Draws a document onto an abstract [`Surface`]: a full redraw of the
//! committed elements, or the incremental mode that overlays the
//! in-progress gesture preview on top of them.

mod pipeline;
mod recording;
mod surface;

pub use pipeline::Pipeline;
pub use recording::{DrawOp, RecordingSurface};
pub use surface::Surface;
