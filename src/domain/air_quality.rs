// Air-quality index categories
use serde::{Deserialize, Serialize};

/// One category of the air-quality index.
///
/// `upper` is inclusive. The last band carries no upper bound and catches
/// everything the earlier bands reject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirQualityBand {
    #[serde(default)]
    pub upper: Option<f64>,
    pub color: String,
    pub label: String,
}

impl AirQualityBand {
    pub fn new(upper: Option<f64>, color: &str, label: &str) -> Self {
        Self {
            upper,
            color: color.to_string(),
            label: label.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidScale {
    #[error("air-quality scale has no bands")]
    Empty,
    #[error("band {index} ({label}) needs an upper bound")]
    MissingUpper { index: usize, label: String },
    #[error("last band ({label}) must not have an upper bound")]
    ClosedLastBand { label: String },
    #[error("band {index} ({label}) upper bound {upper} is not above the previous band")]
    NotAscending { index: usize, label: String, upper: f64 },
}

/// Ordered band table. Color and label always come from the same band, so
/// they can never disagree at a boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct AirQualityScale {
    bands: Vec<AirQualityBand>,
}

impl AirQualityScale {
    pub fn new(bands: Vec<AirQualityBand>) -> Result<Self, InvalidScale> {
        let Some((last, closed)) = bands.split_last() else {
            return Err(InvalidScale::Empty);
        };
        if last.upper.is_some() {
            return Err(InvalidScale::ClosedLastBand {
                label: last.label.clone(),
            });
        }
        let mut previous = f64::NEG_INFINITY;
        for (index, band) in closed.iter().enumerate() {
            let Some(upper) = band.upper else {
                return Err(InvalidScale::MissingUpper {
                    index,
                    label: band.label.clone(),
                });
            };
            if upper.is_nan() || upper <= previous {
                return Err(InvalidScale::NotAscending {
                    index,
                    label: band.label.clone(),
                    upper,
                });
            }
            previous = upper;
        }
        Ok(Self { bands })
    }

    pub fn bands(&self) -> &[AirQualityBand] {
        &self.bands
    }

    /// Evaluates `lower < value <= upper` band by band, with the first band
    /// starting at `0 <= value`. Values failing every check (negative or NaN)
    /// land in the final band.
    pub fn classify(&self, value: f64) -> &AirQualityBand {
        let mut lower: Option<f64> = None;
        for band in &self.bands {
            let Some(upper) = band.upper else {
                return band;
            };
            let above_lower = match lower {
                None => value >= 0.0,
                Some(l) => value > l,
            };
            if above_lower && value <= upper {
                return band;
            }
            lower = Some(upper);
        }
        // unreachable for a validated table: the last band is open
        &self.bands[self.bands.len() - 1]
    }

    /// Classification for a possibly missing index; missing falls through to the worst band.
    pub fn classify_opt(&self, value: Option<f64>) -> &AirQualityBand {
        self.classify(value.unwrap_or(f64::NAN))
    }
}

impl Default for AirQualityScale {
    fn default() -> Self {
        Self {
            bands: vec![
                AirQualityBand::new(Some(50.0), "green", "Good"),
                AirQualityBand::new(Some(100.0), "yellow", "Moderate"),
                AirQualityBand::new(Some(150.0), "orange", "Unhealthy for Sensitive Groups"),
                AirQualityBand::new(Some(200.0), "red", "Unhealthy"),
                AirQualityBand::new(Some(300.0), "purple", "Very Unhealthy"),
                AirQualityBand::new(None, "rose", "Hazardous"),
            ],
        }
    }
}
