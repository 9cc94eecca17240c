use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::timeline::{OverlaySegment, Segment};

#[derive(Debug, Error)]
pub enum EventError {
    #[error("malformed event: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Periodic local position report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilePosition {
    pub position: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    pub file_index: usize,
}

/// Explicit seek in segment-local coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetFilePosition {
    pub position: f64,
    pub index: usize,
}

/// Progress checkpoint in global seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkTime {
    pub work_id: String,
    pub position: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkLoaded {
    pub work_id: String,
    pub title: String,
    pub files: Vec<PathBuf>,
}

/// Snapshot of everything a UI needs to draw the player.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStatus {
    pub ready: bool,
    pub playing: bool,
    pub segment_index: usize,
    pub position: f64,
    pub duration: f64,
    pub position_percentage: f64,
    pub volume_percentage: f64,
    pub muted: bool,
    pub position_formatted: String,
    pub duration_formatted: String,
    pub chapters: Vec<OverlaySegment>,
}

/// Events published to the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum HostEvent {
    UpdateFilePosition(FilePosition),
    SetFilePosition(SetFilePosition),
    /// Spelled the way existing hosts listen for it.
    #[serde(rename = "set_volumn")]
    SetVolume(f64),
    UpdateWorkTime(WorkTime),
    WorkLoaded(WorkLoaded),
    MetadataLoaded(Vec<Segment>),
    Status(PlayerStatus),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoadRequest {
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GlobalSeek {
    pub position: f64,
}

/// Commands sent by the UI.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum UiCommand {
    Load(LoadRequest),
    Play,
    Pause,
    Unload,
    Forward,
    Backward,
    /// Local coordinates; reloads when `index` is not the current segment.
    SetPosition(SetFilePosition),
    /// Global seconds.
    Seek(GlobalSeek),
    SetVolume(f64),
    SetMuted(bool),
    /// Ask for a `status` event.
    Status,
    Quit,
}

impl HostEvent {
    pub fn to_json_line(&self) -> Result<String, EventError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl UiCommand {
    pub fn from_json_line(line: &str) -> Result<Self, EventError> {
        Ok(serde_json::from_str(line.trim())?)
    }
}
