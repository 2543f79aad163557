//! Axis tick generation and formatting.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::format::{abbreviate, format_time_of_day};
use crate::view::Range;

/// Steps in seconds that read naturally on a clock.
const TIME_STEPS: [f64; 16] = [
    1.0, 2.0, 5.0, 10.0, 15.0, 30.0, 60.0, 120.0, 300.0, 600.0, 900.0, 1_800.0, 3_600.0,
    7_200.0, 21_600.0, 86_400.0,
];

/// Formatter for axis tick labels.
#[derive(Clone, Default)]
pub enum AxisFormatter {
    /// Abbreviated numbers (`1.5K`, `2M`).
    #[default]
    Abbreviated,
    /// Wall-clock time of `start + value` seconds.
    TimeOfDay {
        /// Epoch of the axis values.
        start: DateTime<Utc>,
    },
    /// Custom formatter callback.
    Custom(Arc<dyn Fn(f64) -> String + Send + Sync>),
}

impl AxisFormatter {
    /// Format a value for display.
    pub fn format(&self, value: f64) -> String {
        match self {
            Self::Abbreviated => abbreviate(value),
            Self::TimeOfDay { start } => format_time_of_day(*start, value),
            Self::Custom(formatter) => formatter(value),
        }
    }

    /// Whether ticks should land on clock-friendly steps.
    fn is_time(&self) -> bool {
        matches!(self, Self::TimeOfDay { .. })
    }
}

impl std::fmt::Debug for AxisFormatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Abbreviated => write!(f, "AxisFormatter::Abbreviated"),
            Self::TimeOfDay { start } => write!(f, "AxisFormatter::TimeOfDay({start})"),
            Self::Custom(_) => write!(f, "AxisFormatter::Custom(..)"),
        }
    }
}

/// A tick on an axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    /// Tick value in data units.
    pub value: f64,
    /// Label text; empty for minor ticks.
    pub label: String,
    /// Whether the tick is major (labelled, with a grid line).
    pub is_major: bool,
}

/// Ticks for one axis over one range.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AxisLayout {
    /// Ticks in ascending order.
    pub ticks: Vec<AxisTick>,
}

impl AxisLayout {
    /// Lay out roughly `target_major` labelled ticks over `range`, with one
    /// unlabelled minor tick between neighbours.
    pub fn new(range: Range, target_major: usize, formatter: &AxisFormatter) -> Self {
        if !range.is_valid() || target_major == 0 {
            return Self::default();
        }
        let raw = range.span() / target_major as f64;
        let step = if formatter.is_time() {
            time_step(raw)
        } else {
            nice_step(raw)
        };
        if !step.is_finite() || step <= 0.0 {
            return Self::default();
        }

        let minor = step * 0.5;
        let first = (range.min / minor).ceil() as i64;
        let last = (range.max / minor).floor() as i64;
        let ticks = (first..=last)
            .map(|index| {
                let value = index as f64 * minor;
                let is_major = index.rem_euclid(2) == 0;
                AxisTick {
                    value,
                    label: if is_major {
                        formatter.format(value)
                    } else {
                        String::new()
                    },
                    is_major,
                }
            })
            .collect();
        Self { ticks }
    }

    /// Major ticks only.
    pub fn major(&self) -> impl Iterator<Item = &AxisTick> {
        self.ticks.iter().filter(|tick| tick.is_major)
    }
}

/// Round `raw` up to 1, 2, or 5 times a power of ten.
pub fn nice_step(raw: f64) -> f64 {
    if !raw.is_finite() || raw <= 0.0 {
        return 0.0;
    }
    let magnitude = 10_f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

fn time_step(raw: f64) -> f64 {
    if raw <= 1.0 {
        return nice_step(raw);
    }
    TIME_STEPS
        .iter()
        .copied()
        .find(|step| *step >= raw)
        .unwrap_or_else(|| (raw / 86_400.0).ceil() * 86_400.0)
}
