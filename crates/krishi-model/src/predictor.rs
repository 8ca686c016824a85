//! Prediction model traits and implementations.
//!
//! - [`LinearGroundwater`] and [`LinearCropScorer`] are the production
//!   backends, deserialized from JSON weight artifacts exported alongside
//!   the label codecs.
//! - [`MockGroundwater`] and [`MockCrop`] return fixed answers for tests
//!   and for wiring the service without real artifacts.

use std::path::Path;

use serde::Deserialize;

use crate::error::ModelError;

/// Feature vector for one groundwater-level prediction.
///
/// Field order matches the training pipeline: district, month, season,
/// temperature, humidity, pH, year.
#[derive(Debug, Clone, PartialEq)]
pub struct GwlFeatures {
    pub district_id: usize,
    pub month_id: usize,
    pub season_id: usize,
    pub temperature: f64,
    pub humidity: f64,
    pub ph: f64,
    pub year: i32,
}

impl GwlFeatures {
    /// Flatten into the model's expected input order.
    pub fn as_array(&self) -> [f64; 7] {
        [
            self.district_id as f64,
            self.month_id as f64,
            self.season_id as f64,
            self.temperature,
            self.humidity,
            self.ph,
            f64::from(self.year),
        ]
    }
}

/// Feature vector for one crop recommendation.
///
/// Field order matches the training pipeline: district, month, season,
/// year, groundwater level.
#[derive(Debug, Clone, PartialEq)]
pub struct CropFeatures {
    pub district_id: usize,
    pub month_id: usize,
    pub season_id: usize,
    pub year: i32,
    pub groundwater_level: f64,
}

impl CropFeatures {
    /// Flatten into the model's expected input order.
    pub fn as_array(&self) -> [f64; 5] {
        [
            self.district_id as f64,
            self.month_id as f64,
            self.season_id as f64,
            f64::from(self.year),
            self.groundwater_level,
        ]
    }
}

/// Predicts a groundwater level in meters from encoded features.
pub trait GroundwaterModel: Send + Sync {
    fn predict(&self, features: &GwlFeatures) -> Result<f64, ModelError>;
}

/// Predicts a crop id (decodable via the crop codec) from encoded features.
pub trait CropModel: Send + Sync {
    fn predict(&self, features: &CropFeatures) -> Result<usize, ModelError>;
}

// =============================================================================
// Linear backends
// =============================================================================

#[derive(Debug, Deserialize)]
struct RegressionArtifact {
    weights: Vec<f64>,
    intercept: f64,
}

/// Linear regression over the 7 groundwater features.
#[derive(Debug, Clone)]
pub struct LinearGroundwater {
    weights: [f64; 7],
    intercept: f64,
}

impl LinearGroundwater {
    pub fn new(weights: [f64; 7], intercept: f64) -> Self {
        Self { weights, intercept }
    }

    /// Load weights from a JSON artifact:
    /// `{"weights": [w0..w6], "intercept": b}`.
    pub fn from_file(path: &Path) -> Result<Self, ModelError> {
        let content = std::fs::read_to_string(path).map_err(|_| ModelError::ArtifactNotFound {
            path: path.display().to_string(),
        })?;
        let artifact: RegressionArtifact = serde_json::from_str(&content)?;
        let weights: [f64; 7] =
            artifact
                .weights
                .as_slice()
                .try_into()
                .map_err(|_| ModelError::FeatureShape {
                    expected: 7,
                    got: artifact.weights.len(),
                })?;
        Ok(Self::new(weights, artifact.intercept))
    }
}

impl GroundwaterModel for LinearGroundwater {
    fn predict(&self, features: &GwlFeatures) -> Result<f64, ModelError> {
        let x = features.as_array();
        let level = self
            .weights
            .iter()
            .zip(x.iter())
            .map(|(w, v)| w * v)
            .sum::<f64>()
            + self.intercept;
        if !level.is_finite() {
            return Err(ModelError::Prediction(format!(
                "non-finite groundwater level: {}",
                level
            )));
        }
        Ok(level)
    }
}

#[derive(Debug, Deserialize)]
struct ScorerArtifact {
    /// One weight row per crop class, 5 weights each.
    class_weights: Vec<Vec<f64>>,
    intercepts: Vec<f64>,
}

/// One-vs-rest linear scorer over the 5 crop features; the predicted crop
/// is the class with the highest score.
#[derive(Debug, Clone)]
pub struct LinearCropScorer {
    class_weights: Vec<[f64; 5]>,
    intercepts: Vec<f64>,
}

impl LinearCropScorer {
    pub fn new(class_weights: Vec<[f64; 5]>, intercepts: Vec<f64>) -> Result<Self, ModelError> {
        if class_weights.is_empty() || class_weights.len() != intercepts.len() {
            return Err(ModelError::InvalidArtifact(format!(
                "{} weight rows vs {} intercepts",
                class_weights.len(),
                intercepts.len()
            )));
        }
        Ok(Self {
            class_weights,
            intercepts,
        })
    }

    /// Load per-class weights from a JSON artifact:
    /// `{"class_weights": [[w0..w4], ...], "intercepts": [b0, ...]}`.
    pub fn from_file(path: &Path) -> Result<Self, ModelError> {
        let content = std::fs::read_to_string(path).map_err(|_| ModelError::ArtifactNotFound {
            path: path.display().to_string(),
        })?;
        let artifact: ScorerArtifact = serde_json::from_str(&content)?;
        let mut rows = Vec::with_capacity(artifact.class_weights.len());
        for row in &artifact.class_weights {
            let row: [f64; 5] =
                row.as_slice()
                    .try_into()
                    .map_err(|_| ModelError::FeatureShape {
                        expected: 5,
                        got: row.len(),
                    })?;
            rows.push(row);
        }
        Self::new(rows, artifact.intercepts)
    }

    /// Number of crop classes this scorer can produce.
    pub fn class_count(&self) -> usize {
        self.class_weights.len()
    }
}

impl CropModel for LinearCropScorer {
    fn predict(&self, features: &CropFeatures) -> Result<usize, ModelError> {
        let x = features.as_array();
        let mut best = 0usize;
        let mut best_score = f64::NEG_INFINITY;
        for (id, (weights, intercept)) in self
            .class_weights
            .iter()
            .zip(self.intercepts.iter())
            .enumerate()
        {
            let score = weights
                .iter()
                .zip(x.iter())
                .map(|(w, v)| w * v)
                .sum::<f64>()
                + intercept;
            if !score.is_finite() {
                return Err(ModelError::Prediction(format!(
                    "non-finite score for class {}",
                    id
                )));
            }
            if score > best_score {
                best_score = score;
                best = id;
            }
        }
        Ok(best)
    }
}

// =============================================================================
// Mock backends
// =============================================================================

/// Groundwater model returning a fixed level, or a fixed error.
#[derive(Debug, Clone)]
pub struct MockGroundwater {
    level: f64,
    fail: Option<String>,
}

impl MockGroundwater {
    /// Always predicts `level`.
    pub fn new(level: f64) -> Self {
        Self { level, fail: None }
    }

    /// Always fails with the given message.
    pub fn failing(message: &str) -> Self {
        Self {
            level: 0.0,
            fail: Some(message.to_string()),
        }
    }
}

impl GroundwaterModel for MockGroundwater {
    fn predict(&self, _features: &GwlFeatures) -> Result<f64, ModelError> {
        match &self.fail {
            Some(msg) => Err(ModelError::Prediction(msg.clone())),
            None => Ok(self.level),
        }
    }
}

/// Crop model returning a fixed crop id, or a fixed error.
#[derive(Debug, Clone)]
pub struct MockCrop {
    crop_id: usize,
    fail: Option<String>,
}

impl MockCrop {
    /// Always predicts `crop_id`.
    pub fn new(crop_id: usize) -> Self {
        Self {
            crop_id,
            fail: None,
        }
    }

    /// Always fails with the given message.
    pub fn failing(message: &str) -> Self {
        Self {
            crop_id: 0,
            fail: Some(message.to_string()),
        }
    }
}

impl CropModel for MockCrop {
    fn predict(&self, _features: &CropFeatures) -> Result<usize, ModelError> {
        match &self.fail {
            Some(msg) => Err(ModelError::Prediction(msg.clone())),
            None => Ok(self.crop_id),
        }
    }
}
