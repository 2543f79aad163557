//! gpui-timegraph is an immediate-mode time-series graph widget.
//!
//! The host passes the full data set every frame; the graph caches prepared
//! buffers, keeps a live "now" tail on every series, and emits a
//! backend-agnostic [`RenderList`]. The optional `gpui` feature paints that
//! list into a GPUI view.

#![forbid(unsafe_code)]

pub mod axis;
pub mod bounds;
pub mod config;
pub mod controls;
pub mod datasource;
pub mod error;
pub mod format;
pub mod frame;
pub mod geom;
pub mod graph;
pub mod interaction;
pub mod labels;
pub mod legend;
pub mod render;
pub mod series;
pub mod style;
pub mod transform;
pub mod view;
pub mod visibility;

#[cfg(feature = "gpui")]
pub mod gpui_backend;

pub use axis::{AxisFormatter, AxisLayout, AxisTick};
pub use bounds::{calculate_x_limits, compute_y_bounds, index_x_limits};
pub use config::{
    AutoScrollConfig, GraphConfig, GraphType, LegendConfig, LegendPosition, StyleConfig, TimeUnit,
    ValueLabelConfig,
};
pub use datasource::{CacheKey, PreparedGraphData, SourceKey};
pub use error::{GraphError, GraphResult};
pub use frame::FrameInput;
pub use geom::{Point, ScreenPoint, ScreenRect};
pub use graph::{GraphBuilder, GraphFrame, TimeSeriesGraph};
pub use interaction::{GraphAction, HoverHit, binary_search_nearest_x, find_hovered_series};
pub use labels::{LabelCandidate, PlacedLabel, layout_value_labels};
pub use render::{
    ApproxTextMeasurer, Color, LineSegment, LineStyle, RectStyle, RenderCommand, RenderList,
    TextMeasurer, TextStyle,
};
pub use series::{SeriesData, SeriesGroup, SeriesSample, TimeSeries};
pub use style::{PALETTE, Theme, palette_color};
pub use transform::Transform;
pub use view::{Range, Viewport};
pub use visibility::HiddenState;
