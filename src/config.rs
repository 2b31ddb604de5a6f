//! Cover options.
//!
//! This module provides the option set shared by every cover call and
//! re-exports the shape and mode types from the `cover-types` crate.
use serde::de::Error;

pub use cover_types::{HashMode, Shape, ShapeKind};

/// Longest geohash the codec produces.
pub const MAX_PRECISION: usize = 12;

/// Options for one cover call.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoverOptions {
    /// Geohash length of the produced cells
    #[serde(default = "CoverOptions::default_precision")]
    pub precision: usize,

    /// Rule deciding whether a candidate cell belongs to the cover
    #[serde(default)]
    pub hash_mode: HashMode,

    /// Minimum share of a reference cell the shape must cover (intersect mode only)
    #[serde(default)]
    pub min_intersect_fraction: f64,

    /// Keep repeated cells instead of returning each cell once
    #[serde(default = "CoverOptions::default_allow_duplicates")]
    pub allow_duplicates: bool,

    /// Cover the members of a collection on worker threads
    #[serde(default)]
    pub parallel: bool,
}

impl CoverOptions {
    const fn default_precision() -> usize {
        6
    }

    const fn default_allow_duplicates() -> bool {
        true
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_hash_mode(mut self, mode: HashMode) -> Self {
        self.hash_mode = mode;
        self
    }

    pub fn with_min_intersect_fraction(mut self, fraction: f64) -> Self {
        self.min_intersect_fraction = fraction;
        self
    }

    pub fn with_allow_duplicates(mut self, allow: bool) -> Self {
        self.allow_duplicates = allow;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(1..=MAX_PRECISION).contains(&self.precision) {
            return Err(format!(
                "Precision must be between 1 and {}, got {}",
                MAX_PRECISION, self.precision
            ));
        }

        if !(0.0..=1.0).contains(&self.min_intersect_fraction) {
            return Err(format!(
                "Minimum intersect fraction must be within [0, 1], got {}",
                self.min_intersect_fraction
            ));
        }

        if self.min_intersect_fraction > 0.0 && self.hash_mode != HashMode::Intersect {
            log::warn!(
                "min_intersect_fraction {} has no effect in {} mode",
                self.min_intersect_fraction,
                self.hash_mode
            );
        }

        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let options: CoverOptions = serde_json::from_str(json)?;
        if let Err(e) = options.validate() {
            return Err(Error::custom(e));
        }
        Ok(options)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let options: CoverOptions = toml::from_str(toml_str)?;
        if let Err(e) = options.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(options)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for CoverOptions {
    fn default() -> Self {
        Self {
            precision: Self::default_precision(),
            hash_mode: HashMode::default(),
            min_intersect_fraction: 0.0,
            allow_duplicates: Self::default_allow_duplicates(),
            parallel: false,
        }
    }
}
