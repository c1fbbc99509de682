use crate::curve::Curve;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Most grid lines the auto-derived increment allows across the value span.
const MAX_GRID_LINES: f32 = 8.0;

/// Starting increment for the auto-derived grid.
const BASE_INCREMENT: f32 = 0.5;

/// Display and interaction settings of one editor instance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct EditorSettings {
    /// Lowest value the panel displays
    pub value_min: f32,

    /// Highest value the panel displays
    pub value_max: f32,

    /// Value distance between horizontal grid lines
    pub grid_increment: f32,

    /// Half-side of every handle hit-rectangle, in pixels
    pub handle_radius: f32,

    /// Weighted tangent model: handle length follows the per-key weight
    pub weighted_tangents: bool,

    /// Number of samples used to draw the curve silhouette
    pub sampling_rate: usize,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            value_min: -0.5,
            value_max: 1.5,
            grid_increment: 0.5,
            handle_radius: 10.0,
            weighted_tangents: true,
            sampling_rate: 50,
        }
    }
}

impl EditorSettings {
    /// Settings with an explicit value range and grid increment.
    pub fn with_range(value_min: f32, value_max: f32, grid_increment: f32) -> Self {
        Self {
            value_min,
            value_max,
            grid_increment,
            ..Self::default()
        }
        .normalized()
    }

    /// Derive a "nice" range from the curve: double an increment of 0.5
    /// until the keyframe value span fits within eight grid lines, then
    /// pad the range by one increment on each side.
    pub fn fit_to_curve(curve: &Curve) -> Self {
        let mut highest = 0.0f32;
        let mut lowest = 0.0f32;
        for key in curve.keys() {
            highest = highest.max(key.value);
            lowest = lowest.min(key.value);
        }
        let mut increment = BASE_INCREMENT;
        while (highest - lowest) / increment > MAX_GRID_LINES {
            increment *= 2.0;
        }
        Self {
            value_min: lowest - increment,
            value_max: highest + increment,
            grid_increment: increment,
            ..Self::default()
        }
    }

    /// Repair degenerate fields so the space mapping stays well-defined.
    pub fn normalized(mut self) -> Self {
        if !self.value_min.is_finite() || !self.value_max.is_finite() {
            self.value_min = Self::default().value_min;
            self.value_max = Self::default().value_max;
        }
        if self.value_max <= self.value_min {
            self.value_max = self.value_min + BASE_INCREMENT;
        }
        if !(self.grid_increment > 0.0) {
            self.grid_increment = BASE_INCREMENT;
        }
        if !(self.handle_radius > 0.0) {
            self.handle_radius = Self::default().handle_radius;
        }
        self.sampling_rate = self.sampling_rate.max(2);
        self
    }

    /// Number of grid intervals the current range spans.
    pub fn grid_line_count(&self) -> usize {
        ((self.value_max - self.value_min) / self.grid_increment) as usize
    }

    // ========== Persistence ==========

    /// Load settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        let settings: Self = serde_json::from_str(&data)
            .with_context(|| format!("invalid settings file {}", path.display()))?;
        Ok(settings.normalized())
    }

    /// Save settings to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_json::to_string_pretty(self)?;
        fs::write(path, data)
            .with_context(|| format!("failed to write settings to {}", path.display()))?;
        Ok(())
    }
}
