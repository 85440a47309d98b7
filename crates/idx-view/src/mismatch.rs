//! Mismatch records: `[index, actual, predicted]` triples from JSON.

use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use crate::error::FetchError;
use crate::source::Source;
use crate::surface::Caption;

/// A class label as it appeared in the JSON. Strings print without quotes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Label(pub Value);

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(s) => f.write_str(s),
            other => write!(f, "{other}"),
        }
    }
}

impl From<Value> for Label {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// One misclassified example, referencing its image by position.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "(usize, Label, Label)")]
pub struct MismatchRecord {
    pub image_index: usize,
    pub actual: Label,
    pub predicted: Label,
}

impl From<(usize, Label, Label)> for MismatchRecord {
    fn from((image_index, actual, predicted): (usize, Label, Label)) -> Self {
        Self {
            image_index,
            actual,
            predicted,
        }
    }
}

impl MismatchRecord {
    pub fn new(image_index: usize, actual: impl Into<Value>, predicted: impl Into<Value>) -> Self {
        Self {
            image_index,
            actual: Label(actual.into()),
            predicted: Label(predicted.into()),
        }
    }

    /// Two-line caption shown under the comparison image.
    pub fn caption(&self) -> Caption {
        Caption::preformatted(format!(
            "predicted: {}\nactual:    {}",
            self.predicted, self.actual
        ))
    }
}

/// Parses a JSON array of `[index, actual, predicted]` triples.
///
/// ```
/// let records = idx_view::parse_mismatches(br#"[[8, 5, 3], [42, "7", "1"]]"#).unwrap();
/// assert_eq!(records[1].image_index, 42);
/// assert_eq!(records[1].caption().text, "predicted: 1\nactual:    7");
/// ```
pub fn parse_mismatches(bytes: &[u8]) -> Result<Vec<MismatchRecord>, serde_json::Error> {
    serde_json::from_slice(bytes)
}

/// Fetches `resource` and parses it as a mismatch list.
pub async fn load_mismatches<S: Source>(
    source: &S,
    resource: &str,
) -> Result<Vec<MismatchRecord>, FetchError> {
    let bytes = source.fetch(resource).await?;
    parse_mismatches(&bytes).map_err(|source| FetchError::Malformed {
        resource: resource.to_string(),
        source,
    })
}
