//! Snapshot cadence estimation
//!
//! Interpolation between snapshots should last as long as the gap to the
//! next one. The server declares a nominal tick; the real arrival rate
//! jitters around it, so the duration follows a smoothed measurement.

use std::time::Duration;

use crate::consts::{CADENCE_SMOOTHING, MAX_CADENCE_GAP_MS, TICK_INTERVAL_MS};

#[derive(Debug, Clone)]
pub struct CadenceEstimator {
    nominal_ms: f32,
    adaptive: bool,
    last_arrival_ms: Option<f64>,
    estimate_ms: Option<f32>,
}

impl CadenceEstimator {
    /// A nominal interval that is not a positive number falls back to the
    /// default tick
    pub fn new(nominal_ms: f32, adaptive: bool) -> Self {
        let nominal_ms = if nominal_ms.is_finite() && nominal_ms > 0.0 {
            nominal_ms
        } else {
            TICK_INTERVAL_MS
        };
        Self {
            nominal_ms,
            adaptive,
            last_arrival_ms: None,
            estimate_ms: None,
        }
    }

    /// Record a snapshot arrival (milliseconds, monotonic)
    pub fn observe(&mut self, now_ms: f64) {
        if let Some(last) = self.last_arrival_ms {
            let gap = now_ms - last;
            // Zero/negative gaps are clock noise; long ones are stalls
            if gap > 0.0 && gap <= MAX_CADENCE_GAP_MS {
                let gap = gap as f32;
                self.estimate_ms = Some(match self.estimate_ms {
                    Some(estimate) => estimate + CADENCE_SMOOTHING * (gap - estimate),
                    None => gap,
                });
            }
        }
        self.last_arrival_ms = Some(now_ms);
    }

    /// Current interpolation duration
    pub fn interval(&self) -> Duration {
        let ms = match self.estimate_ms {
            Some(estimate) if self.adaptive => {
                estimate.clamp(self.nominal_ms * 0.5, self.nominal_ms * 4.0)
            }
            _ => self.nominal_ms,
        };
        Duration::from_micros((ms * 1000.0).round() as u64)
    }
}
