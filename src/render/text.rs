/// Measures text so labels, legends, and tooltips can be laid out before
/// painting.
pub trait TextMeasurer {
    /// Size `(width, height)` in pixels of a single line of text.
    fn measure(&self, text: &str, size: f32) -> (f32, f32);

    /// Size of multi-line text including a 4px padding on each side.
    fn measure_multiline(&self, text: &str, size: f32) -> (f32, f32) {
        let mut width: f32 = 0.0;
        let mut height: f32 = 0.0;
        for line in text.lines() {
            let (w, h) = self.measure(line, size);
            width = width.max(w);
            height += h.max(size * 1.2);
        }
        (width + 8.0, height + 8.0)
    }
}

/// Fixed-advance measurer for headless hosts and tests.
#[derive(Debug, Clone, Copy)]
pub struct ApproxTextMeasurer {
    /// Glyph advance as a fraction of the font size.
    pub advance: f32,
}

impl Default for ApproxTextMeasurer {
    fn default() -> Self {
        Self { advance: 0.6 }
    }
}

impl TextMeasurer for ApproxTextMeasurer {
    fn measure(&self, text: &str, size: f32) -> (f32, f32) {
        if text.is_empty() {
            return (0.0, 0.0);
        }
        (text.chars().count() as f32 * size * self.advance, size * 1.2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approx_measurer_scales_with_length() {
        let measurer = ApproxTextMeasurer::default();
        let (w, h) = measurer.measure("1.5K", 10.0);
        assert!((w - 24.0).abs() < 1e-4);
        assert!((h - 12.0).abs() < 1e-4);
        let (mw, mh) = measurer.measure_multiline("ab\nabcd", 10.0);
        assert!((mw - 32.0).abs() < 1e-4);
        assert!((mh - 32.0).abs() < 1e-4);
    }
}
