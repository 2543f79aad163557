//! Per-series buffer pool.

use std::collections::{HashMap, HashSet};

/// Reusable X/Y buffers keyed by series name.
///
/// Preparing data every few frames would otherwise reallocate every series;
/// with the pool a series keeps its buffers for as long as its name is in
/// use. Buffers grow to the next power of two so small appends do not
/// reallocate either.
#[derive(Debug, Default, Clone)]
pub(crate) struct BufferPool {
    buffers: HashMap<String, (Vec<f64>, Vec<f64>)>,
}

impl BufferPool {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Take buffers for `name` holding at least `len` entries.
    pub(crate) fn acquire(&mut self, name: &str, len: usize) -> (Vec<f64>, Vec<f64>) {
        let (mut xs, mut ys) = self.buffers.remove(name).unwrap_or_default();
        let target = len.max(1).next_power_of_two();
        if xs.len() < len {
            xs.resize(target, 0.0);
        }
        if ys.len() < len {
            ys.resize(target, 0.0);
        }
        (xs, ys)
    }

    /// Hand buffers back for the next preparation.
    pub(crate) fn recycle(&mut self, name: String, xs: Vec<f64>, ys: Vec<f64>) {
        self.buffers.insert(name, (xs, ys));
    }

    /// Drop buffers whose series no longer exists.
    pub(crate) fn retain_names(&mut self, names: &HashSet<&str>) {
        self.buffers.retain(|name, _| names.contains(name.as_str()));
    }

    /// Number of pooled series.
    pub(crate) fn len(&self) -> usize {
        self.buffers.len()
    }
}
