use crate::tracker::ChangeTracker;

/// Width used to estimate how many characters fit on one visual line.
pub const ESTIMATED_CHAR_WIDTH: f32 = 7.0;

/// Sizing limits for the adaptive text surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceConfig {
    pub max_rows: usize,
    pub max_height: f32,
    pub line_height: f32,
    /// Inset above and below the text; counted in the height but never as a row.
    pub vertical_padding: f32,
}

/// Derived visible size of the text surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub rows: usize,
    pub height: f32,
}

/// Measurement primitive exposed by whatever renders the text surface.
///
/// Mirrors a DOM textarea: once an explicit height is applied, the reported scroll
/// height never drops below it, so callers must clear the override before measuring.
pub trait RenderSurface {
    fn set_content(&mut self, content: &str);
    fn clear_height_override(&mut self);
    /// Natural content extent, floored at any explicit height still applied.
    fn scroll_height(&self) -> f32;
    fn set_height(&mut self, height: f32);
}

/// Row/height bookkeeping for one multi-line input.
///
/// Holds no business data; it only reacts to draft changes handed to it.
#[derive(Debug, Clone)]
pub struct AdaptiveSurface {
    config: SurfaceConfig,
    geometry: Geometry,
    measured: ChangeTracker<String>,
    focus_inputs: ChangeTracker<(Option<String>, String)>,
}

impl AdaptiveSurface {
    pub fn new(config: SurfaceConfig) -> Self {
        Self {
            config,
            geometry: Geometry {
                rows: 1,
                height: (config.line_height + config.vertical_padding * 2.0)
                    .min(config.max_height),
            },
            measured: ChangeTracker::new(),
            focus_inputs: ChangeTracker::new(),
        }
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Re-measures only when `draft` differs from the last measured content.
    pub fn sync<S: RenderSurface + ?Sized>(
        &mut self,
        draft: &str,
        surface: &mut S,
    ) -> Option<Geometry> {
        if !self.measured.observe(&draft.to_string()) {
            return None;
        }

        Some(self.remeasure(draft, surface))
    }

    /// Resets to a single row, drops the explicit height, then clamps the natural extent.
    pub fn remeasure<S: RenderSurface + ?Sized>(
        &mut self,
        draft: &str,
        surface: &mut S,
    ) -> Geometry {
        self.geometry.rows = 1;
        surface.set_content(draft);
        surface.clear_height_override();

        let natural = surface.scroll_height();
        let height = natural.min(self.config.max_height).floor().max(0.0);
        surface.set_height(height);

        self.geometry = Geometry {
            rows: self.rows_for(height),
            height,
        };
        tracing::trace!(
            rows = self.geometry.rows,
            height = self.geometry.height,
            natural,
            "text surface remeasured"
        );
        self.geometry
    }

    /// Edge-triggered focus rule.
    ///
    /// Returns true only when the startup prompt or draft changed since the last call
    /// and at least one of them carries non-whitespace text.
    pub fn should_focus(&mut self, startup: Option<&str>, draft: &str) -> bool {
        let inputs = (startup.map(str::to_string), draft.to_string());
        if !self.focus_inputs.observe(&inputs) {
            return false;
        }

        startup.is_some_and(|value| !value.trim().is_empty()) || !draft.trim().is_empty()
    }

    fn rows_for(&self, height: f32) -> usize {
        if self.config.line_height <= 0.0 {
            return 1;
        }

        let text_height = (height - self.config.vertical_padding * 2.0).max(0.0);
        let rows = (text_height / self.config.line_height).round() as usize;
        rows.clamp(1, self.config.max_rows.max(1))
    }
}

/// Headless surface that estimates wrapped text extent from character counts.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimatedSurface {
    content: String,
    content_width: f32,
    line_height: f32,
    vertical_padding: f32,
    height_override: Option<f32>,
}

impl EstimatedSurface {
    pub fn new(content_width: f32, line_height: f32) -> Self {
        Self {
            content: String::new(),
            content_width,
            line_height,
            vertical_padding: 0.0,
            height_override: None,
        }
    }

    pub fn with_vertical_padding(mut self, padding: f32) -> Self {
        self.vertical_padding = padding.max(0.0);
        self
    }

    /// Adopts the width the text actually wraps at; returns true when it changed.
    pub fn set_content_width(&mut self, content_width: f32) -> bool {
        if !content_width.is_finite() || content_width <= 0.0 {
            return false;
        }
        if (self.content_width - content_width).abs() < 0.5 {
            return false;
        }

        self.content_width = content_width;
        true
    }

    pub fn height_override(&self) -> Option<f32> {
        self.height_override
    }

    fn content_height(&self) -> f32 {
        let chars_per_line =
            (self.content_width / ESTIMATED_CHAR_WIDTH).floor().max(1.0) as usize;

        // `split` keeps the empty tail after a trailing newline, which still occupies a row.
        let line_count = self
            .content
            .split('\n')
            .map(|line| line.chars().count().max(1).div_ceil(chars_per_line))
            .sum::<usize>()
            .max(1);

        line_count as f32 * self.line_height + self.vertical_padding * 2.0
    }
}

impl RenderSurface for EstimatedSurface {
    fn set_content(&mut self, content: &str) {
        if self.content != content {
            self.content = content.to_string();
        }
    }

    fn clear_height_override(&mut self) {
        self.height_override = None;
    }

    fn scroll_height(&self) -> f32 {
        let natural = self.content_height();
        match self.height_override {
            Some(height) => natural.max(height),
            None => natural,
        }
    }

    fn set_height(&mut self, height: f32) {
        self.height_override = Some(height);
    }
}
