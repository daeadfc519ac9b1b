// Pollutant severity classification
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Four ascending breakpoints for one pollutant, in ppm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Breakpoints {
    pub good: f64,
    pub moderate: f64,
    pub unhealthy: f64,
    pub severe: f64,
}

impl Breakpoints {
    pub const fn new(good: f64, moderate: f64, unhealthy: f64, severe: f64) -> Self {
        Self {
            good,
            moderate,
            unhealthy,
            severe,
        }
    }

    pub fn is_ordered(&self) -> bool {
        self.good <= self.moderate && self.moderate <= self.unhealthy && self.unhealthy <= self.severe
    }

    /// Step function with inclusive upper bounds. `severe` is not consulted:
    /// anything above `unhealthy` is red. Values failing every check
    /// (NaN) are red as well.
    pub fn level(&self, value: f64) -> PollutantLevel {
        if value <= self.good {
            PollutantLevel::Green
        } else if value <= self.moderate {
            PollutantLevel::Yellow
        } else if value <= self.unhealthy {
            PollutantLevel::Orange
        } else {
            PollutantLevel::Red
        }
    }
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self::new(50.0, 100.0, 150.0, 200.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PollutantLevel {
    Green,
    Yellow,
    Orange,
    Red,
}

/// Threshold table keyed by stored pollutant name, with a fallback for
/// pollutants it does not list.
#[derive(Debug, Clone, PartialEq)]
pub struct PollutantThresholds {
    table: HashMap<String, Breakpoints>,
    fallback: Breakpoints,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("breakpoints for {pollutant} must be non-decreasing: {breakpoints:?}")]
pub struct InvalidThresholds {
    pub pollutant: String,
    pub breakpoints: Breakpoints,
}

impl PollutantThresholds {
    pub fn new(
        table: HashMap<String, Breakpoints>,
        fallback: Breakpoints,
    ) -> Result<Self, InvalidThresholds> {
        let named = table.iter().map(|(name, b)| (name.as_str(), b));
        for (pollutant, breakpoints) in std::iter::once(("default", &fallback)).chain(named) {
            if !breakpoints.is_ordered() {
                return Err(InvalidThresholds {
                    pollutant: pollutant.to_string(),
                    breakpoints: *breakpoints,
                });
            }
        }
        Ok(Self { table, fallback })
    }

    pub fn breakpoints(&self, pollutant: &str) -> &Breakpoints {
        self.table.get(pollutant).unwrap_or(&self.fallback)
    }

    pub fn level(&self, pollutant: &str, value: f64) -> PollutantLevel {
        self.breakpoints(pollutant).level(value)
    }

    /// A missing concentration compares false against every breakpoint.
    pub fn level_opt(&self, pollutant: &str, value: Option<f64>) -> PollutantLevel {
        self.level(pollutant, value.unwrap_or(f64::NAN))
    }
}

pub fn default_threshold_table() -> HashMap<String, Breakpoints> {
    [
        ("nh3_ppm", Breakpoints::new(1.0, 5.0, 10.0, 20.0)),
        ("so2_ppm", Breakpoints::new(0.1, 0.5, 1.0, 3.0)),
        ("no2_ppm", Breakpoints::new(0.053, 0.1, 0.36, 0.65)),
        ("benzene_ppm", Breakpoints::new(0.005, 0.01, 0.05, 0.1)),
        ("co_ppm", Breakpoints::new(9.0, 15.0, 30.0, 50.0)),
        ("alcohol_ppm", Breakpoints::new(10.0, 50.0, 100.0, 200.0)),
        ("smoke_ppm", Breakpoints::new(5.0, 15.0, 30.0, 50.0)),
    ]
    .into_iter()
    .map(|(name, b)| (name.to_string(), b))
    .collect()
}

impl Default for PollutantThresholds {
    fn default() -> Self {
        Self {
            table: default_threshold_table(),
            fallback: Breakpoints::default(),
        }
    }
}
