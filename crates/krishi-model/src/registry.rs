//! Startup loading and shared ownership of all model artifacts.
//!
//! A missing or corrupt artifact never aborts startup: the registry logs a
//! warning and leaves that capability disabled, so the chat surface can keep
//! answering everything else and explain what is unavailable.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use krishi_core::types::{Season, MONTHS};

use crate::codec::LabelCodec;
use crate::predictor::{CropModel, GroundwaterModel, LinearCropScorer, LinearGroundwater};

/// Artifact file names within the models directory.
const DISTRICT_CODEC_FILE: &str = "label_encoder_district.json";
const MONTH_CODEC_FILE: &str = "label_encoder_month.json";
const SEASON_CODEC_FILE: &str = "label_encoder_season.json";
const CROP_CODEC_FILE: &str = "label_encoder_crop.json";
const GWL_MODEL_FILE: &str = "gwl_prediction_model.json";
const CROP_MODEL_FILE: &str = "crop_recommendation_model.json";

/// Which collaborators loaded, for the health and models endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ModelStatus {
    pub groundwater_model: bool,
    pub crop_model: bool,
    pub districts: usize,
    pub months: usize,
    pub seasons: usize,
    pub crops: usize,
}

/// All prediction collaborators, loaded once and shared read-only.
#[derive(Clone)]
pub struct ModelRegistry {
    pub districts: LabelCodec,
    pub months: LabelCodec,
    pub seasons: LabelCodec,
    pub crops: LabelCodec,
    pub groundwater: Option<Arc<dyn GroundwaterModel>>,
    pub crop: Option<Arc<dyn CropModel>>,
}

impl ModelRegistry {
    /// Build a registry from explicit codecs, with no models attached.
    pub fn new(
        districts: LabelCodec,
        months: LabelCodec,
        seasons: LabelCodec,
        crops: LabelCodec,
    ) -> Self {
        Self {
            districts,
            months,
            seasons,
            crops,
            groundwater: None,
            crop: None,
        }
    }

    /// Attach a groundwater model.
    pub fn with_groundwater(mut self, model: Arc<dyn GroundwaterModel>) -> Self {
        self.groundwater = Some(model);
        self
    }

    /// Attach a crop model.
    pub fn with_crop(mut self, model: Arc<dyn CropModel>) -> Self {
        self.crop = Some(model);
        self
    }

    /// Load every artifact from `dir`, degrading per artifact on failure.
    ///
    /// Month and season vocabularies fall back to the built-in calendar when
    /// their artifacts are absent; districts and crops have no built-in
    /// vocabulary and fall back to empty (which disables the features that
    /// need them, with a warning here and a user-facing message per turn).
    pub fn load(dir: &Path) -> Self {
        let districts = match LabelCodec::from_file(&dir.join(DISTRICT_CODEC_FILE)) {
            Ok(codec) => {
                info!(labels = codec.len(), "District codec loaded");
                codec
            }
            Err(e) => {
                warn!(error = %e, "District codec unavailable - district lookup disabled");
                LabelCodec::empty()
            }
        };

        let months = match LabelCodec::from_file(&dir.join(MONTH_CODEC_FILE)) {
            Ok(codec) => {
                info!(labels = codec.len(), "Month codec loaded");
                codec
            }
            Err(e) => {
                warn!(error = %e, "Month codec unavailable - using built-in calendar");
                LabelCodec::new(MONTHS)
            }
        };

        let seasons = match LabelCodec::from_file(&dir.join(SEASON_CODEC_FILE)) {
            Ok(codec) => {
                info!(labels = codec.len(), "Season codec loaded");
                codec
            }
            Err(e) => {
                warn!(error = %e, "Season codec unavailable - using built-in seasons");
                LabelCodec::new(Season::ALL.iter().map(|s| s.label()))
            }
        };

        let crops = match LabelCodec::from_file(&dir.join(CROP_CODEC_FILE)) {
            Ok(codec) => {
                info!(labels = codec.len(), "Crop codec loaded");
                codec
            }
            Err(e) => {
                warn!(error = %e, "Crop codec unavailable - crop decoding disabled");
                LabelCodec::empty()
            }
        };

        let groundwater: Option<Arc<dyn GroundwaterModel>> =
            match LinearGroundwater::from_file(&dir.join(GWL_MODEL_FILE)) {
                Ok(model) => {
                    info!("Groundwater model loaded");
                    Some(Arc::new(model))
                }
                Err(e) => {
                    warn!(error = %e, "Groundwater model unavailable - prediction disabled");
                    None
                }
            };

        let crop: Option<Arc<dyn CropModel>> =
            match LinearCropScorer::from_file(&dir.join(CROP_MODEL_FILE)) {
                Ok(model) => {
                    if model.class_count() != crops.len() {
                        warn!(
                            classes = model.class_count(),
                            labels = crops.len(),
                            "Crop model class count disagrees with crop codec"
                        );
                    }
                    info!("Crop model loaded");
                    Some(Arc::new(model))
                }
                Err(e) => {
                    warn!(error = %e, "Crop model unavailable - model pick disabled");
                    None
                }
            };

        Self {
            districts,
            months,
            seasons,
            crops,
            groundwater,
            crop,
        }
    }

    /// Snapshot of what loaded, for the API.
    pub fn status(&self) -> ModelStatus {
        ModelStatus {
            groundwater_model: self.groundwater.is_some(),
            crop_model: self.crop.is_some(),
            districts: self.districts.len(),
            months: self.months.len(),
            seasons: self.seasons.len(),
            crops: self.crops.len(),
        }
    }
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("districts", &self.districts.len())
            .field("months", &self.months.len())
            .field("seasons", &self.seasons.len())
            .field("crops", &self.crops.len())
            .field("groundwater", &self.groundwater.is_some())
            .field("crop", &self.crop.is_some())
            .finish()
    }
}
