//! Facade configuration.
//!
//! Thread-local like the rest of the UI-thread state. Install with
//! [`configure`], read with [`config`].

use std::cell::RefCell;
use std::time::Duration;

use crate::types::LengthUnit;

/// Tunables for the facade.
#[derive(Debug, Clone, PartialEq)]
pub struct FacadeConfig {
    /// Pixels per vp.
    pub density: f32,
    /// Font scale applied on top of density for fp lengths.
    pub font_scale: f32,
    /// Materialized items kept on each side of an adapter's visible window
    /// when the host sets no cached count of its own.
    pub default_cached_count: u32,
    /// How long `post_ui_task_and_wait` blocks before giving up.
    pub ui_task_wait_timeout: Duration,
}

impl Default for FacadeConfig {
    fn default() -> Self {
        Self {
            density: 1.0,
            font_scale: 1.0,
            default_cached_count: 1,
            ui_task_wait_timeout: Duration::from_secs(5),
        }
    }
}

impl FacadeConfig {
    /// Defaults overridden by `SPARK_NODE_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();

        if let Some(v) = parse_var(&lookup, "SPARK_NODE_DENSITY") {
            if v > 0.0 {
                cfg.density = v;
            }
        }
        if let Some(v) = parse_var(&lookup, "SPARK_NODE_FONT_SCALE") {
            if v > 0.0 {
                cfg.font_scale = v;
            }
        }
        if let Some(v) = parse_var(&lookup, "SPARK_NODE_CACHED_COUNT") {
            cfg.default_cached_count = v;
        }
        if let Some(ms) = parse_var::<u64>(&lookup, "SPARK_NODE_TASK_TIMEOUT_MS") {
            cfg.ui_task_wait_timeout = Duration::from_millis(ms);
        }

        cfg
    }

    /// Convert `value` from `from` units to `to` units.
    pub fn convert_length(&self, value: f64, from: LengthUnit, to: LengthUnit) -> f64 {
        let px = value * self.px_per(from);
        px / self.px_per(to)
    }

    fn px_per(&self, unit: LengthUnit) -> f64 {
        match unit {
            LengthUnit::Px => 1.0,
            LengthUnit::Vp | LengthUnit::Default => self.density as f64,
            LengthUnit::Fp => (self.density * self.font_scale) as f64,
        }
    }
}

fn parse_var<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            log::warn!("ignoring {key}={raw:?}: not a valid value");
            None
        }
    }
}

thread_local! {
    static CONFIG: RefCell<FacadeConfig> = RefCell::new(FacadeConfig::default());
}

/// Install a configuration for this thread.
pub fn configure(cfg: FacadeConfig) {
    log::debug!("facade configured: {cfg:?}");
    CONFIG.with(|c| *c.borrow_mut() = cfg);
}

/// Current configuration for this thread.
pub fn config() -> FacadeConfig {
    CONFIG.with(|c| c.borrow().clone())
}

/// Convert a length between units with the current density and font scale.
pub fn convert_length_metrics_unit(value: f64, from: LengthUnit, to: LengthUnit) -> f64 {
    CONFIG.with(|c| c.borrow().convert_length(value, from, to))
}

/// Reset configuration to defaults (for testing).
pub fn reset_config() {
    CONFIG.with(|c| *c.borrow_mut() = FacadeConfig::default());
}
