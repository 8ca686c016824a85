//! Label codecs: fixed vocabularies mapping labels to model input ids.
//!
//! Each codec mirrors one of the label encoders the models were trained
//! against, serialized as a JSON artifact of the form
//! `{"classes": ["anantapur", "chittoor", ...]}`. Encoding is
//! case-insensitive; ids are positions in the class list.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

#[derive(Debug, Serialize, Deserialize)]
struct CodecArtifact {
    classes: Vec<String>,
}

/// A fixed vocabulary of valid labels with bidirectional id mapping.
#[derive(Debug, Clone)]
pub struct LabelCodec {
    labels: Vec<String>,
    index: HashMap<String, usize>,
}

impl LabelCodec {
    /// Build a codec from an ordered label list.
    ///
    /// Labels are stored lowercase; later duplicates (after lowercasing)
    /// keep the first occurrence's id.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut stored = Vec::new();
        let mut index = HashMap::new();
        for label in labels {
            let label = label.into().to_lowercase();
            if !index.contains_key(&label) {
                index.insert(label.clone(), stored.len());
                stored.push(label);
            }
        }
        Self {
            labels: stored,
            index,
        }
    }

    /// An empty codec: every `encode` fails, `labels()` is empty.
    pub fn empty() -> Self {
        Self::new(Vec::<String>::new())
    }

    /// Load a codec from a JSON artifact file.
    pub fn from_file(path: &Path) -> Result<Self, ModelError> {
        let content = std::fs::read_to_string(path).map_err(|_| ModelError::ArtifactNotFound {
            path: path.display().to_string(),
        })?;
        let artifact: CodecArtifact = serde_json::from_str(&content)?;
        if artifact.classes.is_empty() {
            return Err(ModelError::InvalidArtifact(format!(
                "{}: empty class list",
                path.display()
            )));
        }
        Ok(Self::new(artifact.classes))
    }

    /// Encode a label to its id. Case-insensitive.
    pub fn encode(&self, label: &str) -> Result<usize, ModelError> {
        self.index
            .get(&label.to_lowercase())
            .copied()
            .ok_or_else(|| ModelError::UnknownLabel {
                label: label.to_string(),
            })
    }

    /// Decode an id back to its label.
    pub fn decode(&self, id: usize) -> Option<&str> {
        self.labels.get(id).map(String::as_str)
    }

    /// Whether the vocabulary contains the label. Case-insensitive.
    pub fn contains(&self, label: &str) -> bool {
        self.index.contains_key(&label.to_lowercase())
    }

    /// The full vocabulary, in id order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of labels in the vocabulary.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the vocabulary is empty.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
