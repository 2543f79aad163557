#[cfg(feature = "gpui")]
use std::time::Duration;

#[cfg(feature = "gpui")]
use chrono::Utc;
#[cfg(feature = "gpui")]
use gpui::{
    AppContext, Application, AsyncWindowContext, Bounds, Timer, WindowBounds, WindowOptions, px,
    size,
};

#[cfg(feature = "gpui")]
use gpui_timegraph::gpui_backend::GpuiGraphView;
#[cfg(feature = "gpui")]
use gpui_timegraph::{
    AutoScrollConfig, Color, GraphConfig, GraphType, SeriesGroup, SeriesSample, TimeSeries,
    TimeSeriesGraph, TimeUnit,
};

#[cfg(feature = "gpui")]
fn main() {
    Application::new().run(|cx| {
        let options = WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(Bounds::centered(
                None,
                size(px(900.0), px(600.0)),
                cx,
            ))),
            ..Default::default()
        };

        cx.open_window(options, |window, cx| {
            let graph = TimeSeriesGraph::builder()
                .config(GraphConfig {
                    graph_type: GraphType::Area,
                    auto_scroll: AutoScrollConfig {
                        enabled: true,
                        value: 30.0,
                        unit: TimeUnit::Seconds,
                        now_position: 80.0,
                    },
                    show_current_value_line: true,
                    ..GraphConfig::default()
                })
                .group(SeriesGroup::new(
                    "sensors",
                    Color::rgb8(0x9c, 0xa3, 0xaf),
                    ["temperature", "pressure"],
                ))
                .build();

            let view = GpuiGraphView::new(graph);
            let handle = view.handle();
            let view_handle = cx.new(|_| view);

            let view_for_task = view_handle.clone();
            window
                .spawn(cx, move |cx: &mut AsyncWindowContext| {
                    let mut cx = cx.clone();
                    async move {
                        let mut series = vec![
                            TimeSeries::new("temperature", Vec::new()),
                            TimeSeries::new("pressure", Vec::new()),
                            TimeSeries::new("load", Vec::new()),
                        ];
                        let mut generation = 0_u64;
                        let mut phase = 0.0_f64;
                        loop {
                            Timer::after(Duration::from_millis(250)).await;
                            let now = Utc::now();
                            phase += 0.15;
                            let temperature = 20.0 + 5.0 * phase.sin();
                            let pressure = 30.0 + 4.0 * phase.cos();
                            series[0].samples.push(SeriesSample::new(now, temperature));
                            series[1].samples.push(SeriesSample::new(now, pressure));
                            // The load series only reports every other tick.
                            if generation % 2 == 0 {
                                let load = 10.0 + 8.0 * (phase * 0.5).sin().abs();
                                series[2].samples.push(SeriesSample::new(now, load));
                            }
                            generation += 1;
                            handle.set_series_generation(series.clone(), generation);
                            cx.update(|_, cx| {
                                view_for_task.update(cx, |_view, view_cx| view_cx.notify());
                            })
                            .ok();
                        }
                    }
                })
                .detach();

            view_handle
        })
        .ok();
    });
}

#[cfg(not(feature = "gpui"))]
fn main() {
    eprintln!("Enable the gpui feature to run this example.");
}
