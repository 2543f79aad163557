use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use gpui::prelude::*;
use gpui::{
    Bounds, MouseButton, MouseDownEvent, MouseMoveEvent, Pixels, Point, Window, canvas, div,
};
use tracing::debug;

use crate::frame::FrameInput;
use crate::geom::{ScreenPoint, ScreenRect};
use crate::graph::TimeSeriesGraph;
use crate::series::TimeSeries;

use super::paint::{paint_render, to_hsla};
use super::text::GpuiTextMeasurer;

/// Data handed to the graph on every frame.
#[derive(Debug, Clone)]
pub enum GraphSource {
    /// Index-based samples.
    Samples(Vec<f64>),
    /// Named time series. With a generation the graph only re-prepares when
    /// it changes; without one the series are fingerprinted.
    Series {
        /// Series to plot.
        series: Vec<TimeSeries>,
        /// Caller-maintained change counter.
        generation: Option<u64>,
    },
}

impl Default for GraphSource {
    fn default() -> Self {
        Self::Samples(Vec::new())
    }
}

/// A GPUI view that renders a [`TimeSeriesGraph`].
///
/// Pointer movement drives the hover readout; left clicks toggle legend
/// entries and operate the auto-scroll drawer. The view repaints every
/// animation frame while it shows time-based data so the "now" tail keeps
/// moving.
#[derive(Clone)]
pub struct GpuiGraphView {
    graph: Arc<RwLock<TimeSeriesGraph>>,
    source: Arc<RwLock<GraphSource>>,
    cursor: Arc<RwLock<Option<ScreenPoint>>>,
}

impl GpuiGraphView {
    /// Create a view for `graph` with no data.
    pub fn new(graph: TimeSeriesGraph) -> Self {
        Self::with_source(graph, GraphSource::default())
    }

    /// Create a view for `graph` starting from `source`.
    pub fn with_source(graph: TimeSeriesGraph, source: GraphSource) -> Self {
        Self {
            graph: Arc::new(RwLock::new(graph)),
            source: Arc::new(RwLock::new(source)),
            cursor: Arc::new(RwLock::new(None)),
        }
    }

    /// Get a handle for feeding data and adjusting the graph.
    ///
    /// This is useful for streaming updates from async tasks.
    pub fn handle(&self) -> GraphHandle {
        GraphHandle {
            graph: Arc::clone(&self.graph),
            source: Arc::clone(&self.source),
        }
    }

    fn on_mouse_move(&mut self, ev: &MouseMoveEvent, cx: &mut Context<Self>) {
        *write(&self.cursor) = Some(screen_point(ev.position));
        cx.notify();
    }

    fn on_mouse_down(&mut self, ev: &MouseDownEvent, cx: &mut Context<Self>) {
        if ev.click_count != 1 {
            return;
        }
        let pos = screen_point(ev.position);
        if let Some(action) = write(&self.graph).handle_click(pos) {
            debug!(?action, "graph click handled");
            cx.notify();
        }
    }

    fn on_hover(&mut self, hovered: bool, cx: &mut Context<Self>) {
        if !hovered {
            *write(&self.cursor) = None;
            cx.notify();
        }
    }
}

impl Render for GpuiGraphView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let graph = Arc::clone(&self.graph);
        let source = Arc::clone(&self.source);
        let cursor = Arc::clone(&self.cursor);
        let background = read(&self.graph).config().theme.background;

        div()
            .id("timegraph")
            .size_full()
            .bg(to_hsla(background))
            .child(
                canvas(
                    move |bounds, window, _| {
                        let cursor = *read(&cursor);
                        let mut graph = write(&graph);
                        let frame = {
                            let measurer = GpuiTextMeasurer::new(window);
                            let input = FrameInput::new(screen_rect(bounds), &measurer)
                                .with_cursor(cursor);
                            match &*read(&source) {
                                GraphSource::Samples(samples) => graph.render(samples, input),
                                GraphSource::Series {
                                    series,
                                    generation: Some(generation),
                                } => graph.render_series_generation(series, *generation, input),
                                GraphSource::Series {
                                    series,
                                    generation: None,
                                } => graph.render_series(series, input),
                            }
                        };
                        if graph.prepared().is_some_and(|data| data.is_time_based()) {
                            window.request_animation_frame();
                        }
                        frame
                    },
                    move |_, frame, window, cx| {
                        paint_render(&frame.render, window, cx);
                    },
                )
                .size_full(),
            )
            .on_mouse_down(
                MouseButton::Left,
                cx.listener(|this, ev, _, cx| {
                    this.on_mouse_down(ev, cx);
                }),
            )
            .on_mouse_move(cx.listener(|this, ev, _, cx| {
                this.on_mouse_move(ev, cx);
            }))
            .on_hover(cx.listener(|this, hovered: &bool, _, cx| {
                this.on_hover(*hovered, cx);
            }))
    }
}

/// A handle for mutating the graph and its data held inside a
/// [`GpuiGraphView`].
///
/// The handle clones cheaply and can be moved into async tasks.
#[derive(Clone)]
pub struct GraphHandle {
    graph: Arc<RwLock<TimeSeriesGraph>>,
    source: Arc<RwLock<GraphSource>>,
}

impl GraphHandle {
    /// Read the graph state.
    ///
    /// The graph is locked for the duration of the callback.
    pub fn read<R>(&self, f: impl FnOnce(&TimeSeriesGraph) -> R) -> R {
        f(&read(&self.graph))
    }

    /// Mutate the graph state.
    ///
    /// The graph is locked for the duration of the callback.
    pub fn write<R>(&self, f: impl FnOnce(&mut TimeSeriesGraph) -> R) -> R {
        f(&mut write(&self.graph))
    }

    /// Mutate the data source in place, e.g. to append samples.
    pub fn update_source<R>(&self, f: impl FnOnce(&mut GraphSource) -> R) -> R {
        f(&mut write(&self.source))
    }

    /// Replace the data with index-based samples.
    pub fn set_samples(&self, samples: Vec<f64>) {
        *write(&self.source) = GraphSource::Samples(samples);
    }

    /// Replace the data with fingerprinted time series.
    pub fn set_series(&self, series: Vec<TimeSeries>) {
        *write(&self.source) = GraphSource::Series {
            series,
            generation: None,
        };
    }

    /// Replace the data with time series tracked by a generation counter.
    pub fn set_series_generation(&self, series: Vec<TimeSeries>, generation: u64) {
        *write(&self.source) = GraphSource::Series {
            series,
            generation: Some(generation),
        };
    }
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

fn screen_point(point: Point<Pixels>) -> ScreenPoint {
    ScreenPoint::new(f32::from(point.x), f32::from(point.y))
}

fn screen_rect(bounds: Bounds<Pixels>) -> ScreenRect {
    ScreenRect::new(
        screen_point(bounds.origin),
        ScreenPoint::new(
            f32::from(bounds.origin.x + bounds.size.width),
            f32::from(bounds.origin.y + bounds.size.height),
        ),
    )
}
