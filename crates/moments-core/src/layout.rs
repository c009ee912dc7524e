//! Year grid layout solver.
//!
//! Packs a fixed number of equally sized dots into a rectangle. The solver
//! picks a column count close to the region's aspect ratio, takes the
//! largest dot size that fits both axes, floors it to a fixed precision so
//! rounding can never push the grid past the boundary, then hands whatever
//! room is left over to the gaps.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MomentsError, Result};

/// Allowed floating-point overshoot when checking a layout against its region.
pub const LAYOUT_TOLERANCE: f64 = 0.01;

/// Tunables for [`calculate_layout`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub min_columns: usize,
    pub max_columns: usize,
    /// Base gap as a fraction of the item size.
    pub spacing_ratio: f64,
    /// Item sizes are floored to a multiple of this.
    pub precision: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_columns: 10,
            max_columns: 20,
            spacing_ratio: 0.4,
            precision: 0.01,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_columns == 0 {
            return Err(MomentsError::InvalidConfig(
                "layout.min_columns must be at least 1".to_string(),
            ));
        }
        if self.min_columns > self.max_columns {
            return Err(MomentsError::InvalidConfig(format!(
                "layout.min_columns ({}) exceeds layout.max_columns ({})",
                self.min_columns, self.max_columns
            )));
        }
        if !self.spacing_ratio.is_finite() || self.spacing_ratio < 0.0 {
            return Err(MomentsError::InvalidConfig(format!(
                "layout.spacing_ratio must be a non-negative number, got {}",
                self.spacing_ratio
            )));
        }
        if !self.precision.is_finite() || self.precision <= 0.0 {
            return Err(MomentsError::InvalidConfig(format!(
                "layout.precision must be positive, got {}",
                self.precision
            )));
        }
        Ok(())
    }
}

/// Grid shape for a fixed item count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearGridLayout {
    pub columns: usize,
    pub rows: usize,
    pub item_size: f64,
    pub horizontal_spacing: f64,
    pub vertical_spacing: f64,
}

impl YearGridLayout {
    /// The layout returned for empty or invalid regions.
    pub fn degenerate() -> Self {
        Self {
            columns: 1,
            rows: 1,
            item_size: 0.0,
            horizontal_spacing: 0.0,
            vertical_spacing: 0.0,
        }
    }

    /// A zero item size means there is nothing to render.
    pub fn is_empty(&self) -> bool {
        self.item_size <= 0.0
    }

    pub fn capacity(&self) -> usize {
        self.columns * self.rows
    }

    pub fn total_width(&self) -> f64 {
        span(self.columns, self.item_size, self.horizontal_spacing)
    }

    pub fn total_height(&self) -> f64 {
        span(self.rows, self.item_size, self.vertical_spacing)
    }

    /// Whether the grid fits inside `width` x `height` within [`LAYOUT_TOLERANCE`].
    pub fn fits(&self, width: f64, height: f64) -> bool {
        self.total_width() <= width + LAYOUT_TOLERANCE
            && self.total_height() <= height + LAYOUT_TOLERANCE
    }
}

fn span(count: usize, size: f64, spacing: f64) -> f64 {
    if count == 0 {
        return 0.0;
    }
    count as f64 * size + (count - 1) as f64 * spacing
}

/// Size a grid of `item_count` items to fit `width` x `height`.
///
/// Out-of-range config values are clamped rather than rejected; use
/// [`LayoutConfig::validate`] to surface them.
///
/// ```
/// use moments_core::layout::{LayoutConfig, calculate_layout};
///
/// let layout = calculate_layout(370.0, 700.0, 365, &LayoutConfig::default());
/// assert!(layout.fits(370.0, 700.0));
/// assert!(layout.capacity() >= 365);
/// ```
pub fn calculate_layout(
    width: f64,
    height: f64,
    item_count: usize,
    config: &LayoutConfig,
) -> YearGridLayout {
    if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) || item_count == 0
    {
        debug!(width, height, item_count, "degenerate layout region");
        return YearGridLayout::degenerate();
    }

    let min_columns = config.min_columns.max(1);
    let max_columns = config.max_columns.max(min_columns);
    let ratio = if config.spacing_ratio.is_finite() && config.spacing_ratio >= 0.0 {
        config.spacing_ratio
    } else {
        LayoutConfig::default().spacing_ratio
    };
    let precision = if config.precision.is_finite() && config.precision > 0.0 {
        config.precision
    } else {
        LayoutConfig::default().precision
    };

    let aspect = height / width;
    let ideal = (item_count as f64 / aspect).sqrt().round() as usize;
    let columns = ideal.clamp(min_columns, max_columns);
    let rows = item_count.div_ceil(columns);

    // n * size + (n - 1) * size * ratio <= extent
    let fit = |count: usize, extent: f64| extent / (count as f64 + (count - 1) as f64 * ratio);
    let raw = fit(columns, width).min(fit(rows, height));
    let mut item_size = (raw / precision).floor() * precision;
    if item_size > raw {
        item_size -= precision;
    }

    if item_size <= 0.0 {
        debug!(width, height, item_count, columns, rows, "region too small for any item");
        return YearGridLayout {
            columns,
            rows,
            item_size: 0.0,
            horizontal_spacing: 0.0,
            vertical_spacing: 0.0,
        };
    }

    let base = item_size * ratio;
    let spread = |count: usize, extent: f64| {
        if count > 1 {
            let leftover = (extent - span(count, item_size, base)).max(0.0);
            base + leftover / (count - 1) as f64
        } else {
            base
        }
    };

    let layout = YearGridLayout {
        columns,
        rows,
        item_size,
        horizontal_spacing: spread(columns, width),
        vertical_spacing: spread(rows, height),
    };
    debug!(?layout, width, height, item_count, "calculated year grid layout");
    layout
}
