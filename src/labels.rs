//! Current-value labels at the right end of each series.
//!
//! Labels are packed greedily: the highest value is anchored beside its data
//! point, the rest walk down-right in stair steps of
//! `row_height / steps_per_row`, cycling through the columns. A label that
//! would collide with one already in its column is pushed below it. A label
//! that would cross the bottom of the plot tries the other columns from the
//! top; labels that fit in no column are dropped. Only labels sharing a
//! column are guaranteed not to overlap.

use crate::config::ValueLabelConfig;
use crate::geom::{ScreenPoint, ScreenRect};
use crate::render::Color;

/// A label waiting for placement.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelCandidate {
    /// Index into the prepared series list.
    pub series_index: usize,
    /// Formatted value.
    pub text: String,
    /// Raw value, used for ordering.
    pub value: f64,
    /// Screen position of the series' last point.
    pub anchor: ScreenPoint,
    /// Series color.
    pub color: Color,
    /// Measured text size `(width, height)` without padding.
    pub text_size: (f32, f32),
}

/// A label with its final position.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLabel {
    /// Index into the prepared series list.
    pub series_index: usize,
    /// Formatted value.
    pub text: String,
    /// Label box, padding included.
    pub rect: ScreenRect,
    /// Data point the label belongs to.
    pub anchor: ScreenPoint,
    /// Series color.
    pub color: Color,
    /// Whether the label moved away from its anchor and needs a leader line.
    pub displaced: bool,
}

/// Place value labels inside `plot`.
pub fn layout_value_labels(
    mut candidates: Vec<LabelCandidate>,
    plot: ScreenRect,
    config: &ValueLabelConfig,
) -> Vec<PlacedLabel> {
    candidates.retain(|candidate| candidate.value.is_finite());
    candidates.sort_by(|a, b| b.value.total_cmp(&a.value));
    candidates.truncate(config.max_visible);
    if candidates.is_empty() || !plot.is_valid() {
        return Vec::new();
    }

    let pad = config.padding.max(0.0);
    let height = candidates
        .iter()
        .map(|c| c.text_size.1)
        .fold(0.0_f32, f32::max)
        + pad * 2.0;
    if height > plot.height() {
        return Vec::new();
    }
    let widest = candidates
        .iter()
        .map(|c| c.text_size.0)
        .fold(0.0_f32, f32::max)
        + pad * 2.0;
    let row = height + config.min_spacing.max(0.0);
    let step = row / config.steps_per_row.max(1) as f32;
    let column_width = widest + config.column_gap.max(0.0);
    let origin_x = candidates
        .iter()
        .map(|c| c.anchor.x)
        .fold(f32::NEG_INFINITY, f32::max)
        + config.offset_x;
    let columns = (((plot.max.x - origin_x) / column_width).floor() as usize).max(1);

    let bottom = plot.max.y - height;
    let stair_origin = (candidates[0].anchor.y - height * 0.5).clamp(plot.min.y, bottom);

    let mut column_tops: Vec<Vec<f32>> = vec![Vec::new(); columns];
    let mut placed = Vec::with_capacity(candidates.len());

    for (index, candidate) in candidates.into_iter().enumerate() {
        let home = index.saturating_sub(1) % columns;
        let stair = stair_origin + step * index as f32;
        let slot = first_fit(&column_tops[home], stair, row, bottom)
            .map(|top| (home, top))
            .or_else(|| {
                (1..columns)
                    .map(|offset| (home + offset) % columns)
                    .find_map(|column| {
                        first_fit(&column_tops[column], plot.min.y, row, bottom)
                            .map(|top| (column, top))
                    })
            });
        let Some((column, top)) = slot else {
            continue;
        };
        let tops = &mut column_tops[column];
        let at = tops.partition_point(|existing| *existing < top);
        tops.insert(at, top);

        let width = candidate.text_size.0 + pad * 2.0;
        let left = (origin_x + column as f32 * column_width)
            .min(plot.max.x - width)
            .max(plot.min.x);
        let rect = ScreenRect::from_origin_size(ScreenPoint::new(left, top), (width, height));
        let displaced = column > 0 || (rect.center_y() - candidate.anchor.y).abs() > 1.0;
        placed.push(PlacedLabel {
            series_index: candidate.series_index,
            text: candidate.text,
            rect,
            anchor: candidate.anchor,
            color: candidate.color,
            displaced,
        });
    }
    placed
}

/// First top at or below `desired` that keeps a full `row` away from every
/// label already in the column. `tops` is sorted ascending.
fn first_fit(tops: &[f32], desired: f32, row: f32, bottom: f32) -> Option<f32> {
    let mut top = desired;
    for existing in tops {
        if *existing >= top + row {
            break;
        }
        if (top - existing).abs() < row {
            top = existing + row;
        }
    }
    (top <= bottom).then_some(top)
}

/// Topmost label under `point`.
pub fn label_at(labels: &[PlacedLabel], point: ScreenPoint) -> Option<&PlacedLabel> {
    labels.iter().rev().find(|label| label.rect.contains(point))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plot() -> ScreenRect {
        ScreenRect::new(ScreenPoint::new(0.0, 0.0), ScreenPoint::new(400.0, 200.0))
    }

    fn candidate(series_index: usize, value: f64, anchor_y: f32) -> LabelCandidate {
        LabelCandidate {
            series_index,
            text: format!("{value}"),
            value,
            anchor: ScreenPoint::new(300.0, anchor_y),
            color: Color::WHITE,
            text_size: (20.0, 10.0),
        }
    }

    fn config() -> ValueLabelConfig {
        ValueLabelConfig {
            padding: 0.0,
            min_spacing: 2.0,
            steps_per_row: 2,
            offset_x: 8.0,
            column_gap: 4.0,
            ..ValueLabelConfig::default()
        }
    }

    fn assert_column_spacing(labels: &[PlacedLabel], min_spacing: f32) {
        for a in labels {
            for b in labels {
                let same_column = a.rect.min.x == b.rect.min.x;
                if std::ptr::eq(a, b) || !same_column || a.rect.min.y > b.rect.min.y {
                    continue;
                }
                assert!(
                    b.rect.min.y >= a.rect.max.y + min_spacing - 1e-3,
                    "{a:?} overlaps {b:?}"
                );
            }
        }
    }

    #[test]
    fn highest_label_sits_on_its_anchor() {
        let labels = layout_value_labels(vec![candidate(0, 5.0, 80.0)], plot(), &config());
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].rect.center_y(), 80.0);
        assert_eq!(labels[0].rect.min.x, 308.0);
        assert!(!labels[0].displaced);
    }

    #[test]
    fn crowded_labels_keep_column_spacing() {
        let candidates = (0..6).map(|i| candidate(i, 10.0 - i as f64, 50.0)).collect();
        let labels = layout_value_labels(candidates, plot(), &config());
        assert_eq!(labels.len(), 6);
        assert_eq!(labels[0].series_index, 0);
        assert!(labels[1..].iter().all(|label| label.displaced));
        assert_column_spacing(&labels, 2.0);
    }

    #[test]
    fn labels_are_ordered_by_value_and_capped() {
        let candidates = vec![
            candidate(0, 1.0, 150.0),
            candidate(1, 3.0, 20.0),
            candidate(2, 2.0, 90.0),
        ];
        let cfg = ValueLabelConfig {
            max_visible: 2,
            ..config()
        };
        let labels = layout_value_labels(candidates, plot(), &cfg);
        let order: Vec<usize> = labels.iter().map(|l| l.series_index).collect();
        assert_eq!(order, vec![1, 2]);
    }

    #[test]
    fn overflow_moves_to_next_column_or_drops() {
        let short = ScreenRect::new(ScreenPoint::new(0.0, 0.0), ScreenPoint::new(400.0, 40.0));
        let candidates: Vec<_> = (0..10).map(|i| candidate(i, 10.0 - i as f64, 5.0)).collect();
        let cfg = ValueLabelConfig {
            max_visible: 10,
            ..config()
        };
        let labels = layout_value_labels(candidates, short, &cfg);
        // Three rows fit per column; 92px right of the anchor fit three 24px columns.
        assert_eq!(labels.len(), 9);
        assert!(!labels.iter().any(|l| l.series_index == 9));
        assert!(labels.iter().all(|l| l.rect.max.y <= 40.0 && l.rect.max.x <= 400.0));
        assert_column_spacing(&labels, 2.0);
        for column in [308.0, 332.0, 356.0] {
            assert_eq!(labels.iter().filter(|l| l.rect.min.x == column).count(), 3);
        }
    }

    #[test]
    fn cap_keeps_highest_values() {
        let candidates: Vec<_> = (0..10).map(|i| candidate(i, i as f64, 100.0)).collect();
        let labels = layout_value_labels(candidates, plot(), &config());
        assert_eq!(labels.len(), ValueLabelConfig::default().max_visible);
        assert!(labels.iter().all(|l| l.series_index >= 2));
    }

    #[test]
    fn stair_step_changes_placement() {
        let place = |steps_per_row| {
            let candidates = (0..5).map(|i| candidate(i, 10.0 - i as f64, 10.0)).collect();
            let cfg = ValueLabelConfig {
                steps_per_row,
                ..config()
            };
            let labels = layout_value_labels(candidates, plot(), &cfg);
            assert_eq!(labels.len(), 5);
            assert_column_spacing(&labels, 2.0);
            labels
                .iter()
                .map(|l| (l.rect.min.x, l.rect.min.y))
                .collect::<Vec<_>>()
        };
        let coarse = place(1);
        let fine = place(8);
        assert_ne!(coarse, fine);
        // One full row per step: the third label sits two rows below the
        // anchored one, in the second column.
        assert_eq!(coarse[2], (332.0, 5.0 + 24.0));
        // Eight steps per row: the same label is only a quarter row down.
        assert_eq!(fine[2], (332.0, 5.0 + 3.0));
    }

    #[test]
    fn label_hit_test() {
        let labels = layout_value_labels(vec![candidate(3, 5.0, 80.0)], plot(), &config());
        assert_eq!(
            label_at(&labels, ScreenPoint::new(310.0, 80.0)).map(|l| l.series_index),
            Some(3)
        );
        assert!(label_at(&labels, ScreenPoint::new(10.0, 80.0)).is_none());
    }
}
