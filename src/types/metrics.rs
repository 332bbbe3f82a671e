use crate::error::{KycError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::path::Path;

pub const MAX_SCORE: f64 = 100.0;

/// Short field names and the backend names they also accept.
const FIELD_ALIASES: [(&str, &str); 3] = [
    ("score", "final_score"),
    ("receipts_processed", "processed_receipts"),
    ("receipts_uploaded", "total_receipts"),
];

/// A user's verification standing as reported by the backend.
///
/// Accepts the `/verification/score` payload directly (`final_score`,
/// `total_receipts`, decimal strings) as well as the short field names.
/// Numeric fields that are missing, unparsable, negative or non-finite
/// read as zero. When a payload carries both the short and the backend
/// name for a field, the short name wins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSnapshot {
    #[serde(default, alias = "final_score", deserialize_with = "lenient_number")]
    pub score: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub total_spending: f64,
    #[serde(
        default,
        alias = "processed_receipts",
        deserialize_with = "lenient_count"
    )]
    pub receipts_processed: u32,
    #[serde(
        default,
        alias = "total_receipts",
        deserialize_with = "lenient_optional_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub receipts_uploaded: Option<u32>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub unique_companies: u32,
    #[serde(default, deserialize_with = "lenient_count")]
    pub date_range_days: u32,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_verified: bool,
}

impl MetricSnapshot {
    pub fn from_json(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| KycError::SnapshotParse(e.to_string()))?;
        let Value::Object(mut fields) = value else {
            return Err(KycError::SnapshotParse(
                "snapshot must be a JSON object".to_string(),
            ));
        };
        for (name, alias) in FIELD_ALIASES {
            if fields.contains_key(name) && fields.remove(alias).is_some() {
                tracing::debug!(field = name, alias, "ignoring backend alias");
            }
        }
        let snapshot: MetricSnapshot = serde_json::from_value(Value::Object(fields))
            .map_err(|e| KycError::SnapshotParse(e.to_string()))?;
        Ok(snapshot.sanitized())
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(KycError::PathNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content).map_err(|e| match e {
            KycError::SnapshotParse(msg) => {
                KycError::SnapshotParse(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    /// Copy with every float forced into its valid range.
    pub fn sanitized(self) -> Self {
        Self {
            score: sanitize(self.score).min(MAX_SCORE),
            total_spending: sanitize(self.total_spending),
            ..self
        }
    }

    /// Uploaded receipt count, falling back to the processed count.
    pub fn receipts_uploaded(&self) -> u32 {
        self.receipts_uploaded.unwrap_or(self.receipts_processed)
    }
}

pub fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

fn number_from_value(value: &Value) -> f64 {
    let raw = match value {
        Value::Number(number) => number.as_f64().unwrap_or(0.0),
        Value::String(text) => text.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    sanitize(raw)
}

fn count_from_value(value: &Value) -> u32 {
    // float to int casts saturate
    number_from_value(value).floor() as u32
}

fn lenient_number<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_from_value(&value))
}

fn lenient_count<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(count_from_value(&value))
}

fn lenient_optional_count<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(Some(count_from_value(&value)))
}

fn lenient_bool<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(flag) => flag,
        Value::String(text) => text.trim().eq_ignore_ascii_case("true"),
        Value::Number(number) => number.as_f64().map(|n| n != 0.0).unwrap_or(false),
        _ => false,
    })
}
