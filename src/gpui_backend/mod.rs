//! GPUI integration for gpui-timegraph.
//!
//! [`GpuiGraphView`] owns a [`TimeSeriesGraph`](crate::graph::TimeSeriesGraph),
//! feeds it the latest data every frame, paints the resulting render list,
//! and routes pointer input to hover and click handling.

mod paint;
mod text;
mod view;

pub use view::{GpuiGraphView, GraphHandle, GraphSource};
