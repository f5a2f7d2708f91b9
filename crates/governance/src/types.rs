use std::fmt;

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};

/// Action carried by a POI proposal.
///
/// Tags other than `add_poi` and `remove_poi` are kept verbatim in
/// [`PoiAction::Unsupported`] so the encoder can reject them by name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PoiAction {
    AddPoi,
    RemovePoi,
    Unsupported(String),
}

impl PoiAction {
    pub fn as_str(&self) -> &str {
        match self {
            PoiAction::AddPoi => "add_poi",
            PoiAction::RemovePoi => "remove_poi",
            PoiAction::Unsupported(tag) => tag,
        }
    }
}

impl From<String> for PoiAction {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "add_poi" => PoiAction::AddPoi,
            "remove_poi" => PoiAction::RemovePoi,
            _ => PoiAction::Unsupported(tag),
        }
    }
}

impl From<PoiAction> for String {
    fn from(action: PoiAction) -> Self {
        action.as_str().to_owned()
    }
}

impl fmt::Display for PoiAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `configuration` object of a POI proposal.
///
/// Only `x`, `y` and `type` drive encoding. The rest is informational and
/// tolerates being absent or `null`.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoiConfiguration {
    pub x: i64,
    pub y: i64,
    #[serde(rename = "type")]
    pub action: PoiAction,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub choices: Vec<String>,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub description: String,
}

/// A proposal as returned by the governance API.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalRecord {
    pub id: String,
    /// Address of the proposer.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub user: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub status: String,
    pub configuration: PoiConfiguration,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub enacted: bool,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub start_at: Option<String>,
    #[serde(default)]
    pub finish_at: Option<String>,
}

/// Envelope of `GET /proposals`. Every field is required.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceResponse {
    pub ok: bool,
    pub total: u64,
    pub data: Vec<ProposalRecord>,
}

/// A POI change waiting to be proposed to the multisig.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PendingChange {
    pub action: PoiAction,
    /// `"<x>,<y>"`
    pub coordinates: String,
}

impl PendingChange {
    pub fn new(action: PoiAction, x: i64, y: i64) -> Self {
        Self {
            action,
            coordinates: format!("{x},{y}"),
        }
    }
}

impl From<&ProposalRecord> for PendingChange {
    fn from(record: &ProposalRecord) -> Self {
        let PoiConfiguration { x, y, action, .. } = &record.configuration;
        PendingChange::new(action.clone(), *x, *y)
    }
}
