//! Error types for graph preparation and frame building.

use thiserror::Error;

/// Errors raised while building or painting a graph frame.
///
/// None of these reach the host's render loop: the frame builder turns them
/// into an inline message and the next frame starts from scratch.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The plot area collapsed to zero width or height.
    #[error("plot area too small ({width}x{height})")]
    PlotAreaTooSmall {
        /// Width in pixels.
        width: f32,
        /// Height in pixels.
        height: f32,
    },
    /// Axis limits could not be mapped to the screen.
    #[error("invalid axis range x=[{x_min}, {x_max}] y=[{y_min}, {y_max}]")]
    InvalidAxisRange {
        /// Lower X limit.
        x_min: f64,
        /// Upper X limit.
        x_max: f64,
        /// Lower Y limit.
        y_min: f64,
        /// Upper Y limit.
        y_max: f64,
    },
    /// A configuration document could not be parsed or serialized.
    #[error("invalid graph config: {0}")]
    Config(#[from] serde_json::Error),
    /// The render backend rejected a draw call.
    #[error("render backend failure: {0}")]
    Backend(String),
}

/// Convenience alias for results carrying [`GraphError`].
pub type GraphResult<T> = Result<T, GraphError>;
