//! Builder for cover engines
//!
//! This module provides a builder pattern for assembling cover options,
//! either field by field or from a configuration file.

use crate::config::{CoverOptions, HashMode};
use crate::cover::GeohashCover;
use crate::error::{CoverError, Result};
#[cfg(feature = "toml")]
use std::path::Path;

/// Builder for a [`GeohashCover`] engine.
#[derive(Debug, Clone, Default)]
pub struct CoverBuilder {
    options: CoverOptions,
}

impl CoverBuilder {
    /// Create a new builder with default options (precision 6, intersect mode).
    pub fn new() -> Self {
        Self {
            options: CoverOptions::default(),
        }
    }

    /// Replace all options at once.
    pub fn options(mut self, options: CoverOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the geohash length of produced cells.
    pub fn precision(mut self, precision: usize) -> Self {
        self.options = self.options.with_precision(precision);
        self
    }

    pub fn hash_mode(mut self, mode: HashMode) -> Self {
        self.options = self.options.with_hash_mode(mode);
        self
    }

    /// Require each cell to share at least `fraction` of a reference cell's
    /// area with the shape. Only honored in intersect mode.
    pub fn min_intersect_fraction(mut self, fraction: f64) -> Self {
        self.options = self.options.with_min_intersect_fraction(fraction);
        self
    }

    pub fn allow_duplicates(mut self, allow: bool) -> Self {
        self.options = self.options.with_allow_duplicates(allow);
        self
    }

    /// Cover collection members on worker threads.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.options = self.options.with_parallel(parallel);
        self
    }

    /// Load options from a TOML file, replacing any set so far.
    #[cfg(feature = "toml")]
    pub fn config_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            CoverError::InvalidConfig(format!("Cannot read {}: {}", path.display(), e))
        })?;
        self.options = CoverOptions::from_toml(&text)
            .map_err(|e| CoverError::InvalidConfig(e.to_string()))?;
        Ok(self)
    }

    /// Validate the options and build the engine.
    pub fn build(self) -> Result<GeohashCover> {
        GeohashCover::new(self.options)
    }
}

impl TryFrom<CoverBuilder> for GeohashCover {
    type Error = CoverError;

    fn try_from(builder: CoverBuilder) -> Result<Self> {
        builder.build()
    }
}
