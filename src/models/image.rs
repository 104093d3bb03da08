use super::view::ViewType;
use serde::{Deserialize, Serialize};

/// A reference image ready to be embedded inline in a generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedImage {
    pub payload: String, // Base64 encoded
    pub mime_type: String,
}

impl EncodedImage {
    pub fn new(payload: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            mime_type: mime_type.into(),
        }
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.payload)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewResult {
    pub label: ViewType,
    /// `None` when generation for this view failed.
    pub image_data_uri: Option<String>,
}

impl ViewResult {
    pub fn success(label: ViewType, image_data_uri: String) -> Self {
        Self {
            label,
            image_data_uri: Some(image_data_uri),
        }
    }

    pub fn failed(label: ViewType) -> Self {
        Self {
            label,
            image_data_uri: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.image_data_uri.is_some()
    }
}

/// The six results of one generation, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRun {
    pub results: Vec<ViewResult>,
}

impl GenerationRun {
    pub fn new(results: Vec<ViewResult>) -> Self {
        Self { results }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn get(&self, view: ViewType) -> Option<&ViewResult> {
        self.results.iter().find(|result| result.label == view)
    }

    pub fn labels(&self) -> Vec<ViewType> {
        self.results.iter().map(|result| result.label).collect()
    }

    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.len() - self.succeeded()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ViewResult> {
        self.results.iter()
    }
}

impl<'a> IntoIterator for &'a GenerationRun {
    type Item = &'a ViewResult;
    type IntoIter = std::slice::Iter<'a, ViewResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}
