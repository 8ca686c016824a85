//! Prediction collaborators for the Krishi chat service.
//!
//! Wraps the pre-trained groundwater and crop models plus the label codecs
//! that translate between human labels (district, month, season, crop) and
//! the integer ids the models consume. Artifacts are loaded once at startup
//! and shared read-only for the process lifetime.

pub mod codec;
pub mod error;
pub mod predictor;
pub mod registry;

pub use codec::LabelCodec;
pub use error::ModelError;
pub use predictor::{
    CropFeatures, CropModel, GroundwaterModel, GwlFeatures, LinearCropScorer, LinearGroundwater,
    MockCrop, MockGroundwater,
};
pub use registry::{ModelRegistry, ModelStatus};
