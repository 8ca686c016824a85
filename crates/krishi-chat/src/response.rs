//! Advisory response generation.
//!
//! Turns an intent plus resolved slots into the reply text, calling the
//! prediction collaborators where needed. Every collaborator failure is
//! rendered into the reply instead of propagating; a chat turn never fails
//! because a model did.

use krishi_core::config::AdvisorConfig;
use krishi_core::types::Season;
use krishi_model::{CropFeatures, CropModel, GroundwaterModel, GwlFeatures, ModelError, ModelRegistry};

use crate::types::{EffectiveSlots, Intent};

const GREETING_REPLY: &str =
    "Namaste! I'm Krishi, your farming assistant. Ask me about crops or water levels.";

const FALLBACK_REPLY: &str = "Sorry, I didn't catch that. Try asking something like: \
     'What is the groundwater level in Tirupati in June 2025?'";

const GROUNDWATER_GUIDANCE: &str =
    "Please provide a valid district and month to check the groundwater level.";

const CROP_GUIDANCE: &str = "Please provide a valid district and month to suggest crops.";

const GROUNDWATER_UNAVAILABLE: &str =
    "Groundwater prediction is unavailable right now because its model files did not load.";

/// Crop shortlist for a groundwater level band, shallower bands first.
fn crop_shortlist(level: f64) -> &'static [&'static str] {
    if level >= 70.0 {
        &["Paddy", "Sugarcane", "Banana"]
    } else if level >= 40.0 {
        &["Maize", "Soybean", "Groundnut"]
    } else if level >= 20.0 {
        &["Millet", "Cotton", "Chickpea"]
    } else {
        &["Mustard", "Horsegram", "Pearl Millet"]
    }
}

/// Irrigation method suited to a groundwater level band.
fn irrigation_advice(level: f64) -> &'static str {
    if level >= 70.0 {
        "Flood irrigation or check dam-based irrigation is suitable."
    } else if level >= 40.0 {
        "Sprinkler irrigation is recommended to optimize usage."
    } else if level >= 20.0 {
        "Drip irrigation is highly recommended to conserve water."
    } else {
        "Use advanced drip irrigation with water harvesting techniques."
    }
}

/// Capitalize the first letter of each whitespace-separated word.
fn title_case(label: &str) -> String {
    label
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// =============================================================================
// AdvisoryComposer
// =============================================================================

/// Generates the reply text for each intent.
pub struct AdvisoryComposer {
    advisor: AdvisorConfig,
}

impl AdvisoryComposer {
    /// Create a composer with the given default model inputs.
    pub fn new(advisor: AdvisorConfig) -> Self {
        Self { advisor }
    }

    /// Render the reply for an intent and its resolved slots.
    pub fn respond(&self, intent: Intent, slots: &EffectiveSlots, models: &ModelRegistry) -> String {
        match intent {
            Intent::PredictGroundwater => self.compose_groundwater(slots, models),
            Intent::RecommendCrop => self.compose_crop(slots, models),
            Intent::Greeting => GREETING_REPLY.to_string(),
            Intent::Unknown => FALLBACK_REPLY.to_string(),
        }
    }

    // -----------------------------------------------------------------
    // Groundwater prediction
    // -----------------------------------------------------------------

    fn compose_groundwater(&self, slots: &EffectiveSlots, models: &ModelRegistry) -> String {
        let (Some(district), Some(month), Some(season)) =
            (&slots.district, &slots.month, slots.season)
        else {
            return GROUNDWATER_GUIDANCE.to_string();
        };

        if !models.districts.contains(district) {
            return format!(
                "Sorry, I couldn't find groundwater data for '{}'.",
                title_case(district)
            );
        }

        let Some(model) = models.groundwater.as_deref() else {
            return GROUNDWATER_UNAVAILABLE.to_string();
        };

        match self.predict_level(model, models, district, month, season, slots.year) {
            Ok(level) => format!(
                "In {}, during {} {}, the estimated groundwater level is around {:.2} meters.",
                title_case(district),
                title_case(month),
                slots.year,
                level
            ),
            Err(e) => format!("Warning: groundwater prediction failed: {}", e),
        }
    }

    // -----------------------------------------------------------------
    // Crop recommendation
    // -----------------------------------------------------------------

    fn compose_crop(&self, slots: &EffectiveSlots, models: &ModelRegistry) -> String {
        let (Some(district), Some(month), Some(season)) =
            (&slots.district, &slots.month, slots.season)
        else {
            return CROP_GUIDANCE.to_string();
        };

        if !models.districts.contains(district) {
            return format!(
                "Sorry, I couldn't find crop data for '{}'.",
                title_case(district)
            );
        }

        let Some(model) = models.groundwater.as_deref() else {
            return GROUNDWATER_UNAVAILABLE.to_string();
        };

        let level = match self.predict_level(model, models, district, month, season, slots.year) {
            Ok(level) => level,
            Err(e) => return format!("Warning: groundwater prediction failed: {}", e),
        };

        let mut lines = vec![
            "Based on the groundwater level:".to_string(),
            format!(
                "Location: {}, Month: {}, Year: {}",
                title_case(district),
                title_case(month),
                slots.year
            ),
            format!("Suitable crops: {}", crop_shortlist(level).join(", ")),
            format!("Groundwater level: {:.2} meters", level),
            format!("Suggested irrigation: {}", irrigation_advice(level)),
        ];

        if let Some(crop_model) = models.crop.as_deref() {
            match self.predict_crop(crop_model, models, district, month, season, slots.year, level)
            {
                Ok(Some(crop)) => lines.push(format!("Model pick: {}", title_case(&crop))),
                Ok(None) => {}
                Err(e) => lines.push(format!("Note: crop model prediction failed: {}", e)),
            }
        }

        lines.join("\n")
    }

    // -----------------------------------------------------------------
    // Collaborator calls
    // -----------------------------------------------------------------

    fn predict_level(
        &self,
        model: &dyn GroundwaterModel,
        models: &ModelRegistry,
        district: &str,
        month: &str,
        season: Season,
        year: i32,
    ) -> Result<f64, ModelError> {
        let features = GwlFeatures {
            district_id: models.districts.encode(district)?,
            month_id: models.months.encode(month)?,
            season_id: models.seasons.encode(season.label())?,
            temperature: self.advisor.temperature,
            humidity: self.advisor.humidity,
            ph: self.advisor.ph,
            year,
        };
        model.predict(&features)
    }

    #[allow(clippy::too_many_arguments)]
    fn predict_crop(
        &self,
        model: &dyn CropModel,
        models: &ModelRegistry,
        district: &str,
        month: &str,
        season: Season,
        year: i32,
        level: f64,
    ) -> Result<Option<String>, ModelError> {
        let features = CropFeatures {
            district_id: models.districts.encode(district)?,
            month_id: models.months.encode(month)?,
            season_id: models.seasons.encode(season.label())?,
            year,
            groundwater_level: level,
        };
        let crop_id = model.predict(&features)?;
        Ok(models.crops.decode(crop_id).map(title_case))
    }
}

// =============================================================================
// Tests
// =============================================================================
