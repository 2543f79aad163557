//! The time-series graph widget.
//!
//! [`TimeSeriesGraph`] is immediate-mode: the host hands it the full data set
//! every frame and gets back a [`GraphFrame`] to paint. Data is only
//! re-prepared when its identity, the hidden set, or the auto-scroll switch
//! changes; otherwise the cached series are reused and only the "now" tail
//! and the axis bounds move.

use tracing::{debug, trace, warn};

use crate::axis::AxisFormatter;
use crate::bounds::refresh_bounds;
use crate::config::GraphConfig;
use crate::controls::apply_control;
use crate::datasource::{
    BufferPool, CacheKey, PreparedGraphData, SourceKey, prepare_indexed, prepare_time_series,
};
use crate::frame::{FrameContext, FrameInput, build_frame, build_message};
use crate::geom::{ScreenPoint, ScreenRect};
use crate::interaction::{GraphAction, HitTargets, HoverHit};
use crate::render::RenderList;
use crate::series::{SeriesGroup, TimeSeries};
use crate::view::Range;
use crate::visibility::HiddenState;

/// What the graph produced for one frame.
#[derive(Debug, Clone)]
pub struct GraphFrame {
    /// Draw commands, in paint order.
    pub render: RenderList,
    /// Series under the cursor, if any.
    pub hover: Option<HoverHit>,
    /// Plot area inside the axes, when a graph was drawn.
    pub plot_rect: Option<ScreenRect>,
    /// Message of the error that replaced the frame, if any.
    pub error: Option<String>,
}

enum GraphInput<'a> {
    Indexed(&'a [f64]),
    Series(&'a [TimeSeries]),
}

/// Time-series graph widget state.
#[derive(Debug)]
pub struct TimeSeriesGraph {
    config: GraphConfig,
    groups: Vec<SeriesGroup>,
    hidden: HiddenState,
    manual_y: Option<Range>,
    x_formatter: Option<AxisFormatter>,
    y_formatter: AxisFormatter,
    prepared: Option<PreparedGraphData>,
    cache_key: Option<CacheKey>,
    stale: bool,
    preparations: u64,
    pool: BufferPool,
    targets: HitTargets,
}

impl TimeSeriesGraph {
    /// Create a graph with default configuration.
    pub fn new() -> Self {
        Self::with_config(GraphConfig::default())
    }

    /// Create a graph with the given configuration.
    pub fn with_config(config: GraphConfig) -> Self {
        Self {
            config,
            groups: Vec::new(),
            hidden: HiddenState::new(),
            manual_y: None,
            x_formatter: None,
            y_formatter: AxisFormatter::default(),
            prepared: None,
            cache_key: None,
            stale: true,
            preparations: 0,
            pool: BufferPool::new(),
            targets: HitTargets::default(),
        }
    }

    /// Start building a graph with custom configuration.
    pub fn builder() -> GraphBuilder {
        GraphBuilder::default()
    }

    /// Access the configuration.
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Access the configuration mutably.
    ///
    /// Style changes apply on the next frame. Toggling auto-scroll re-prepares
    /// the data.
    pub fn config_mut(&mut self) -> &mut GraphConfig {
        &mut self.config
    }

    /// Configured series groups.
    pub fn groups(&self) -> &[SeriesGroup] {
        &self.groups
    }

    /// Replace the series groups shown in the legend.
    pub fn set_groups(&mut self, groups: Vec<SeriesGroup>) {
        debug!(groups = groups.len(), "series groups replaced");
        self.groups = groups;
        self.stale = true;
    }

    /// Current hidden series and groups.
    pub fn hidden(&self) -> &HiddenState {
        &self.hidden
    }

    /// Hide or show a series. Returns `true` when it is now hidden.
    pub fn toggle_series_visibility(&mut self, name: &str) -> bool {
        let hidden = self.hidden.toggle_series(name);
        debug!(series = name, hidden, "series visibility toggled");
        hidden
    }

    /// Hide or show every member of a group. Returns `true` when the group is
    /// now hidden.
    pub fn toggle_group_visibility(&mut self, name: &str) -> bool {
        let hidden = self.hidden.toggle_group(name);
        debug!(group = name, hidden, "group visibility toggled");
        hidden
    }

    /// Pin the Y axis to `[min, max]` until [`clear_bounds`](Self::clear_bounds).
    pub fn update_bounds(&mut self, min: f64, max: f64) {
        let range = Range::new(min, max);
        if !range.is_valid() {
            warn!(min, max, "ignoring invalid manual Y bounds");
            return;
        }
        self.manual_y = Some(range);
    }

    /// Return to computed Y bounds.
    pub fn clear_bounds(&mut self) {
        self.manual_y = None;
    }

    /// Manually pinned Y bounds, if any.
    pub fn manual_bounds(&self) -> Option<Range> {
        self.manual_y
    }

    /// Override the X tick formatter. `None` picks wall-clock time for
    /// time-based data and abbreviated numbers for index-based data.
    pub fn set_x_formatter(&mut self, formatter: Option<AxisFormatter>) {
        self.x_formatter = formatter;
    }

    /// Set the Y tick formatter.
    pub fn set_y_formatter(&mut self, formatter: AxisFormatter) {
        self.y_formatter = formatter;
    }

    /// Force the next frame to re-prepare its data.
    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    /// Data prepared for the last frame.
    pub fn prepared(&self) -> Option<&PreparedGraphData> {
        self.prepared.as_ref()
    }

    /// Number of full data preparations so far.
    pub fn preparations(&self) -> u64 {
        self.preparations
    }

    /// Render index-based samples: X is the sample position.
    pub fn render(&mut self, samples: &[f64], frame: FrameInput<'_>) -> GraphFrame {
        let source = SourceKey::of_samples(samples);
        self.render_input(GraphInput::Indexed(samples), source, frame)
    }

    /// Render named time series. Changes are detected by fingerprint; see
    /// [`SourceKey::of_series`].
    pub fn render_series(&mut self, series: &[TimeSeries], frame: FrameInput<'_>) -> GraphFrame {
        let source = SourceKey::of_series(series);
        self.render_input(GraphInput::Series(series), source, frame)
    }

    /// Render named time series whose identity the caller tracks with a
    /// generation counter. Data is re-prepared only when `generation` changes.
    pub fn render_series_generation(
        &mut self,
        series: &[TimeSeries],
        generation: u64,
        frame: FrameInput<'_>,
    ) -> GraphFrame {
        self.render_input(
            GraphInput::Series(series),
            SourceKey::Generation(generation),
            frame,
        )
    }

    /// Handle a click at `point` using the hit regions of the last frame.
    ///
    /// Legend clicks toggle visibility and control clicks update the
    /// auto-scroll settings. The applied action is returned.
    pub fn handle_click(&mut self, point: ScreenPoint) -> Option<GraphAction> {
        let action = self.targets.action_at(point)?;
        match &action {
            GraphAction::ToggleSeries(name) => {
                self.toggle_series_visibility(name);
            }
            GraphAction::ToggleGroup(name) => {
                self.toggle_group_visibility(name);
            }
            other => {
                apply_control(&mut self.config.auto_scroll, other);
                debug!(action = ?other, "auto-scroll control applied");
            }
        }
        Some(action)
    }

    fn render_input(
        &mut self,
        input: GraphInput<'_>,
        source: SourceKey,
        frame: FrameInput<'_>,
    ) -> GraphFrame {
        let key = CacheKey {
            source,
            hidden_hash: self.hidden.state_hash(),
            auto_scroll: self.config.auto_scroll.enabled,
        };
        if self.stale || self.cache_key != Some(key) {
            if let Some(previous) = self.prepared.take() {
                previous.recycle_into(&mut self.pool);
            }
            self.prepared = match input {
                GraphInput::Indexed(samples) => {
                    prepare_indexed(samples, &self.config.theme, &mut self.pool)
                }
                GraphInput::Series(series) => {
                    prepare_time_series(series, &self.groups, frame.now, &mut self.pool)
                }
            };
            self.cache_key = Some(key);
            self.stale = false;
            self.preparations += 1;
            debug!(
                preparations = self.preparations,
                has_data = self.prepared.is_some(),
                "graph data prepared"
            );
        } else {
            trace!("graph data cache hit");
        }

        let Some(data) = self.prepared.as_mut() else {
            self.targets = HitTargets::default();
            return self.message_frame(&frame, &self.config.placeholder, None);
        };
        data.extend_to(frame.now);
        refresh_bounds(
            data,
            &self.config.auto_scroll,
            self.config.style.range_epsilon,
            &self.hidden,
            self.manual_y,
        );
        self.build(frame)
    }

    fn build(&mut self, frame: FrameInput<'_>) -> GraphFrame {
        let Some(data) = self.prepared.as_ref() else {
            return self.message_frame(&frame, &self.config.placeholder, None);
        };
        let x_formatter = self.x_formatter.clone().unwrap_or_else(|| {
            if data.is_time_based() {
                AxisFormatter::TimeOfDay {
                    start: data.start_time(),
                }
            } else {
                AxisFormatter::Abbreviated
            }
        });
        let ctx = FrameContext {
            data,
            config: &self.config,
            hidden: &self.hidden,
            x_formatter: &x_formatter,
            y_formatter: &self.y_formatter,
        };
        match build_frame(&ctx, &frame) {
            Ok(built) => {
                self.targets = built.targets;
                GraphFrame {
                    render: built.render,
                    hover: built.hover,
                    plot_rect: built.plot_rect,
                    error: None,
                }
            }
            Err(err) => {
                warn!(error = %err, "graph frame replaced with error text");
                self.targets = HitTargets::default();
                let message = err.to_string();
                self.message_frame(&frame, &message, Some(message.clone()))
            }
        }
    }

    fn message_frame(
        &self,
        frame: &FrameInput<'_>,
        message: &str,
        error: Option<String>,
    ) -> GraphFrame {
        let theme = &self.config.theme;
        let color = if error.is_some() {
            theme.error
        } else {
            theme.placeholder
        };
        GraphFrame {
            render: build_message(frame.bounds, message, color, theme, frame.measurer),
            hover: None,
            plot_rect: None,
            error,
        }
    }
}

impl Default for TimeSeriesGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for configuring a graph before construction.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    config: GraphConfig,
    groups: Vec<SeriesGroup>,
    x_formatter: Option<AxisFormatter>,
    y_formatter: AxisFormatter,
}

impl GraphBuilder {
    /// Set the full configuration.
    pub fn config(mut self, config: GraphConfig) -> Self {
        self.config = config;
        self
    }

    /// Add a series group.
    pub fn group(mut self, group: SeriesGroup) -> Self {
        self.groups.push(group);
        self
    }

    /// Set the X tick formatter.
    pub fn x_formatter(mut self, formatter: AxisFormatter) -> Self {
        self.x_formatter = Some(formatter);
        self
    }

    /// Set the Y tick formatter.
    pub fn y_formatter(mut self, formatter: AxisFormatter) -> Self {
        self.y_formatter = formatter;
        self
    }

    /// Build the graph.
    pub fn build(self) -> TimeSeriesGraph {
        let mut graph = TimeSeriesGraph::with_config(self.config);
        graph.groups = self.groups;
        graph.x_formatter = self.x_formatter;
        graph.y_formatter = self.y_formatter;
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GraphType, LegendPosition};
    use crate::render::{ApproxTextMeasurer, Color};
    use crate::series::SeriesSample;
    use chrono::{DateTime, TimeDelta, TimeZone, Utc};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap() + TimeDelta::seconds(secs)
    }

    fn bounds() -> ScreenRect {
        ScreenRect::new(ScreenPoint::new(0.0, 0.0), ScreenPoint::new(800.0, 480.0))
    }

    fn input(measurer: &ApproxTextMeasurer, now: DateTime<Utc>) -> FrameInput<'_> {
        FrameInput::new(bounds(), measurer).with_now(now)
    }

    fn series(name: &str, points: &[(i64, f64)]) -> TimeSeries {
        TimeSeries::new(
            name,
            points
                .iter()
                .map(|(secs, value)| SeriesSample::new(at(*secs), *value))
                .collect(),
        )
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn indexed_samples_bound_and_color() {
        let measurer = ApproxTextMeasurer::default();
        let mut graph = TimeSeriesGraph::new();
        let frame = graph.render(&[10.0, 20.0, 15.0, 30.0], input(&measurer, at(0)));
        assert!(frame.error.is_none());

        let data = graph.prepared().expect("prepared");
        assert_eq!(data.x_range(), Range::new(0.0, 3.0));
        assert!(approx(data.y_range().min, 7.0));
        assert!(approx(data.y_range().max, 33.0));
        assert_eq!(data.series()[0].color(), graph.config().theme.bullish);
    }

    #[test]
    fn empty_input_renders_placeholder() {
        let measurer = ApproxTextMeasurer::default();
        let mut graph = TimeSeriesGraph::new();
        let frame = graph.render_series(&[], input(&measurer, at(0)));
        assert!(graph.prepared().is_none());
        assert!(frame.error.is_none());
        assert_eq!(frame.render.texts().collect::<Vec<_>>(), vec!["No data available"]);
        assert!(graph.handle_click(ScreenPoint::new(10.0, 10.0)).is_none());
    }

    #[test]
    fn cache_hit_still_moves_tail() {
        let measurer = ApproxTextMeasurer::default();
        let mut graph = TimeSeriesGraph::new();
        let data = vec![series("a", &[(0, 1.0), (10, 2.0)])];

        graph.render_series(&data, input(&measurer, at(20)));
        graph.render_series(&data, input(&measurer, at(50)));
        assert_eq!(graph.preparations(), 1);
        let prepared = graph.prepared().unwrap();
        assert_eq!(prepared.series()[0].last_point(), Some((50.0, 2.0)));
        assert!(approx(prepared.x_range().max, 52.5));
    }

    #[test]
    fn generation_controls_re_preparation() {
        let measurer = ApproxTextMeasurer::default();
        let mut graph = TimeSeriesGraph::new();
        let mut data = vec![series("a", &[(0, 1.0)])];
        graph.render_series_generation(&data, 1, input(&measurer, at(5)));

        data[0].samples.push(SeriesSample::new(at(4), 9.0));
        graph.render_series_generation(&data, 1, input(&measurer, at(5)));
        assert_eq!(graph.preparations(), 1);
        assert_eq!(graph.prepared().unwrap().series()[0].real_point_count(), 1);

        graph.render_series_generation(&data, 2, input(&measurer, at(5)));
        assert_eq!(graph.preparations(), 2);
        assert_eq!(graph.prepared().unwrap().series()[0].real_point_count(), 2);

        graph.invalidate();
        graph.render_series_generation(&data, 2, input(&measurer, at(5)));
        assert_eq!(graph.preparations(), 3);
    }

    #[test]
    fn hidden_group_leaves_bounds() {
        let measurer = ApproxTextMeasurer::default();
        let mut graph = TimeSeriesGraph::builder()
            .group(SeriesGroup::new("big", Color::WHITE, ["A", "B"]))
            .build();
        let data = vec![
            series("A", &[(0, 1_000.0)]),
            series("B", &[(0, 900.0)]),
            series("C", &[(0, 10.0), (5, 20.0)]),
        ];
        graph.render_series(&data, input(&measurer, at(10)));
        assert!(graph.prepared().unwrap().y_range().max > 1_000.0);

        assert!(graph.toggle_group_visibility("big"));
        graph.render_series(&data, input(&measurer, at(10)));
        let y = graph.prepared().unwrap().y_range();
        assert!(approx(y.min, 8.5));
        assert!(approx(y.max, 21.5));
        assert_eq!(graph.preparations(), 2);
    }

    #[test]
    fn manual_bounds_override_until_cleared() {
        let measurer = ApproxTextMeasurer::default();
        let mut graph = TimeSeriesGraph::new();
        graph.update_bounds(-5.0, 5.0);
        graph.render(&[1.0, 2.0], input(&measurer, at(0)));
        assert_eq!(graph.prepared().unwrap().y_range(), Range::new(-5.0, 5.0));

        graph.update_bounds(f64::NAN, 1.0);
        assert_eq!(graph.manual_bounds(), Some(Range::new(-5.0, 5.0)));

        graph.clear_bounds();
        graph.render(&[1.0, 2.0], input(&measurer, at(0)));
        assert_ne!(graph.prepared().unwrap().y_range(), Range::new(-5.0, 5.0));
    }

    #[test]
    fn auto_scroll_places_now_in_window() {
        let measurer = ApproxTextMeasurer::default();
        let mut graph = TimeSeriesGraph::new();
        graph.config_mut().auto_scroll.enabled = true;
        graph.config_mut().auto_scroll.value = 1.0;
        let data = vec![series("a", &[(0, 1.0), (3_000, 2.0)])];
        graph.render_series(&data, input(&measurer, at(3_600)));

        let x = graph.prepared().unwrap().x_range();
        assert!(approx(x.span(), 60.0));
        assert!(approx(x.fraction_of(3_600.0), 0.75));
    }

    #[test]
    fn clicks_toggle_legend_and_controls() {
        let measurer = ApproxTextMeasurer::default();
        let config = GraphConfig {
            legend: crate::config::LegendConfig {
                position: LegendPosition::Outside,
                ..Default::default()
            },
            ..GraphConfig::default()
        };
        let mut graph = TimeSeriesGraph::with_config(config);
        let data = vec![series("alpha", &[(0, 1.0), (5, 2.0)])];
        graph.render_series(&data, input(&measurer, at(10)));

        // Outside legend strip sits at the bottom; its first row starts at the
        // strip's left padding.
        let legend_row = ScreenPoint::new(12.0, 480.0 - 48.0 + 12.0);
        assert_eq!(
            graph.handle_click(legend_row),
            Some(GraphAction::ToggleSeries("alpha".to_string()))
        );
        assert!(graph.hidden().is_series_hidden("alpha"));

        // The controls drawer starts with the auto-scroll toggle.
        assert_eq!(
            graph.handle_click(ScreenPoint::new(8.0, 12.0)),
            Some(GraphAction::ToggleAutoScroll)
        );
        assert!(graph.config().auto_scroll.enabled);
    }

    #[test]
    fn frame_errors_become_inline_text() {
        let measurer = ApproxTextMeasurer::default();
        let mut graph = TimeSeriesGraph::new();
        let tiny = ScreenRect::new(ScreenPoint::new(0.0, 0.0), ScreenPoint::new(40.0, 20.0));
        let frame = graph.render(&[1.0, 2.0], FrameInput::new(tiny, &measurer).with_now(at(0)));
        let error = frame.error.expect("error reported");
        assert!(error.contains("too small"));
        assert_eq!(frame.render.texts().collect::<Vec<_>>(), vec![error.as_str()]);
    }

    #[test]
    fn clock_skew_keeps_series_sorted() {
        let measurer = ApproxTextMeasurer::default();
        let mut graph = TimeSeriesGraph::new();
        let data = vec![series("a", &[(0, 1.0), (100, 2.0)])];
        graph.render_series(&data, input(&measurer, at(40)));
        let prepared = graph.prepared().unwrap();
        assert_eq!(prepared.total_time_span(), 100.0);
        assert!(prepared.series()[0].xs().is_sorted());
    }

    #[test]
    fn stairs_render_without_fill() {
        let measurer = ApproxTextMeasurer::default();
        let mut graph = TimeSeriesGraph::with_config(GraphConfig {
            graph_type: GraphType::Stairs,
            ..GraphConfig::default()
        });
        let frame = graph.render(&[3.0, 1.0, 2.0], input(&measurer, at(0)));
        assert!(frame.error.is_none());
        assert_eq!(
            graph.prepared().unwrap().series()[0].color(),
            graph.config().theme.bearish
        );
    }
}
