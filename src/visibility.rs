//! Series and group hide state toggled from the legend.

use std::collections::BTreeSet;
use std::hash::{DefaultHasher, Hash, Hasher};

use crate::series::SeriesData;

/// Names of series and groups the user hid.
///
/// Hiding is independent of a series' own `visible` flag: a series is drawn
/// only when it is visible, not hidden itself, and none of its groups is
/// hidden.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HiddenState {
    series: BTreeSet<String>,
    groups: BTreeSet<String>,
}

impl HiddenState {
    /// Nothing hidden.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip a series. Returns `true` when the series is now hidden.
    pub fn toggle_series(&mut self, name: &str) -> bool {
        toggle(&mut self.series, name)
    }

    /// Flip a group. Returns `true` when the group is now hidden.
    pub fn toggle_group(&mut self, name: &str) -> bool {
        toggle(&mut self.groups, name)
    }

    /// Whether the series itself was hidden.
    pub fn is_series_hidden(&self, name: &str) -> bool {
        self.series.contains(name)
    }

    /// Whether the group was hidden.
    pub fn is_group_hidden(&self, name: &str) -> bool {
        self.groups.contains(name)
    }

    /// Whether the series is hidden directly or through any of its groups.
    pub fn hides(&self, series: &SeriesData) -> bool {
        self.is_series_hidden(series.name())
            || series
                .group_names()
                .iter()
                .any(|group| self.is_group_hidden(group))
    }

    /// Whether the series should be drawn.
    pub fn is_drawn(&self, series: &SeriesData) -> bool {
        series.is_visible() && !self.hides(series)
    }

    /// Hidden series names, sorted.
    pub fn hidden_series(&self) -> impl Iterator<Item = &str> {
        self.series.iter().map(String::as_str)
    }

    /// Hidden group names, sorted.
    pub fn hidden_groups(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(String::as_str)
    }

    /// Stable hash of both sets.
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

impl Hash for HiddenState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.series.hash(state);
        // Separates {"a"},{} from {},{"a"}.
        0xffu8.hash(state);
        self.groups.hash(state);
    }
}

fn toggle(set: &mut BTreeSet<String>, name: &str) -> bool {
    if set.remove(name) {
        false
    } else {
        set.insert(name.to_string());
        true
    }
}
