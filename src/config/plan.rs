//! Eased fixed-plan configuration from TOML.

use serde::Deserialize;

use crate::motion::EaseShape;

/// Parameters of a pre-planned eased run.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PlanConfig {
    /// Whole revolutions per run.
    #[serde(default = "default_rotations")]
    pub rotations: u16,

    /// Speed curve across the run.
    #[serde(default)]
    pub shape: EaseShape,

    /// Uniform stretch (>1) or compression (<1) of every delay.
    #[serde(default = "default_time_scale")]
    pub time_scale: f32,

    /// Delay at full speed, in microseconds.
    #[serde(default = "default_peak_delay_us")]
    pub peak_delay_us: u32,

    /// Shortest delay any table entry may hold.
    #[serde(default = "default_floor_us")]
    pub floor_us: u32,

    /// Longest delay any table entry may hold.
    #[serde(default = "default_ceiling_us")]
    pub ceiling_us: u32,

    /// Run back the other way after each completed run.
    #[serde(default = "default_reverse_on_complete")]
    pub reverse_on_complete: bool,

    /// Time the completion screen stays up before the next run.
    #[serde(default = "default_pause_ms")]
    pub pause_ms: u32,
}

fn default_rotations() -> u16 {
    5
}

fn default_time_scale() -> f32 {
    1.0
}

fn default_peak_delay_us() -> u32 {
    300
}

fn default_floor_us() -> u32 {
    300
}

fn default_ceiling_us() -> u32 {
    4000
}

fn default_reverse_on_complete() -> bool {
    true
}

fn default_pause_ms() -> u32 {
    1000
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            rotations: default_rotations(),
            shape: EaseShape::default(),
            time_scale: default_time_scale(),
            peak_delay_us: default_peak_delay_us(),
            floor_us: default_floor_us(),
            ceiling_us: default_ceiling_us(),
            reverse_on_complete: default_reverse_on_complete(),
            pause_ms: default_pause_ms(),
        }
    }
}

impl PlanConfig {
    /// Total steps in one run.
    pub fn total_steps(&self, steps_per_revolution: u16) -> u32 {
        self.rotations as u32 * steps_per_revolution as u32
    }
}
