//! Request payloads and decoded results for the validation backend.
//!
//! Each result type declares its wire mapping with serde attributes: camelCase names,
//! `#[serde(default)]` plus `null_as_default` for every field the backend may omit or
//! send as `null`, and a timestamp adapter for date fields. Missing and null fields
//! resolve to `false`, `0`, `0.0`, `""`, an empty list or `None`; they never fail the
//! decode.

use crate::timestamp::{deserialize_optional_timestamp, deserialize_timestamp};
use chrono::{DateTime, FixedOffset, Utc};
use serde::de::Error;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Origin of the submitted conversational data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum DataSource {
    Telegram = 0,
}

impl From<DataSource> for u8 {
    fn from(source: DataSource) -> Self {
        source as u8
    }
}

impl TryFrom<u8> for DataSource {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(DataSource::Telegram),
            other => Err(format!("unknown data source: {}", other)),
        }
    }
}

/// Submission metadata produced by the proof pipeline
#[derive(Debug, Clone, Deserialize)]
pub struct SourceData {
    /// Submitter identifier on the data source
    pub user: String,
    pub source: DataSource,
    /// Token issued to the submitter, forwarded on every call
    pub proof_token: String,
    pub submitted_by: String,
    pub submission_date: DateTime<Utc>,
}

/// Wire form of `SourceData`
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SubmissionPayload<'a> {
    pub proof_token: &'a str,
    pub data_source: DataSource,
    pub source_id: &'a str,
    pub submitted_by: &'a str,
    pub submitted_on: String,
}

impl SourceData {
    pub fn to_submission_json(&self) -> SubmissionPayload<'_> {
        SubmissionPayload {
            proof_token: &self.proof_token,
            data_source: self.source,
            source_id: &self.user,
            submitted_by: &self.submitted_by,
            submitted_on: self.submission_date.to_rfc3339(),
        }
    }
}

/// Raw chat export handed to the evaluate endpoint untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawInputData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub chats: Vec<RawChat>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub submission_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawChat {
    #[serde(default)]
    pub chat_id: Value,
    #[serde(default, deserialize_with = "null_as_default")]
    pub contents: Vec<Value>,
}

/// Body of `api/submissions/evaluate`
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EvaluateRequest<'a> {
    #[serde(flatten)]
    pub source: SubmissionPayload<'a>,
    pub submission_token: &'a str,
    pub chats: Vec<EvaluateChat<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EvaluateChat<'a> {
    pub chat_id: &'a Value,
    pub contents: &'a [Value],
}

impl<'a> EvaluateRequest<'a> {
    pub fn new(source_data: &'a SourceData, raw_input: &'a RawInputData) -> Self {
        Self {
            source: source_data.to_submission_json(),
            submission_token: &raw_input.submission_token,
            chats: raw_input
                .chats
                .iter()
                .map(|chat| EvaluateChat {
                    chat_id: &chat.chat_id,
                    contents: &chat.contents,
                })
                .collect(),
        }
    }
}

/// A single recorded chat session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub participant_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub chat_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub chat_length: u64,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub chat_start_on: DateTime<FixedOffset>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub chat_ended_on: DateTime<FixedOffset>,
}

/// Chat sessions grouped under one source chat, in response order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatHistoryGroup {
    #[serde(default, deserialize_with = "deserialize_chat_id")]
    pub source_chat_id: String,
    #[serde(default, rename = "chats", deserialize_with = "null_as_default")]
    pub chat_list: Vec<ChatRecord>,
}

/// Response of `api/submissions/historical-data`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionHistoryResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_valid: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub error_text: String,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub last_submission: Option<DateTime<FixedOffset>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub chat_histories: Vec<ChatHistoryGroup>,
}

/// Backend scores for one chat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationDetail {
    #[serde(default, deserialize_with = "deserialize_chat_id")]
    pub source_chat_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub chat_quality: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub chat_uniqueness: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationDetails {
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_messages: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub unique_messages: u64,
    #[serde(default)]
    pub llm_reasoning: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub chat_summaries: Vec<EvaluationDetail>,
}

/// Response of `api/submissions/evaluate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_valid: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub error_text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub quality: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub uniqueness: f64,
    /// Combined score as computed by the backend
    #[serde(default, deserialize_with = "null_as_default")]
    pub score: f64,
    #[serde(default, deserialize_with = "deserialize_details")]
    pub details: Option<EvaluationDetails>,
}

impl EvaluationResult {
    /// Result reported when the evaluate call itself did not succeed
    pub fn failure(error_text: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error_text: error_text.into(),
            quality: 0.0,
            uniqueness: 0.0,
            score: 0.0,
            details: None,
        }
    }
}

/// Response of `api/submissions/submit-data`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_valid: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub error_text: String,
}

/// Explicit `null` resolves to the same default as a missing key
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// An empty `details` object carries nothing and is treated as absent
fn deserialize_details<'de, D>(deserializer: D) -> Result<Option<EvaluationDetails>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Map<String, Value>>::deserialize(deserializer)? {
        Some(map) if !map.is_empty() => EvaluationDetails::deserialize(Value::Object(map))
            .map(Some)
            .map_err(Error::custom),
        _ => Ok(None),
    }
}

/// Chat identifiers arrive as strings or plain numbers depending on the source
fn deserialize_chat_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        _ => Err(Error::custom("chat id must be a string or number")),
    }
}
