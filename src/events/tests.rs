use super::*;
use crate::timeline::{Chapter, OverlaySegment, Segment};
use serde_json::{Value, json};
use std::time::Duration;

fn as_value(event: &HostEvent) -> Value {
    serde_json::from_str(&event.to_json_line().unwrap()).unwrap()
}

#[test]
fn update_file_position_uses_camel_case_index() {
    let ev = HostEvent::UpdateFilePosition(FilePosition {
        position: 12.5,
        duration: Some(300.0),
        file_index: 2,
    });
    assert_eq!(
        as_value(&ev),
        json!({
            "event": "update_file_position",
            "payload": { "position": 12.5, "duration": 300.0, "fileIndex": 2 }
        })
    );
}

#[test]
fn update_file_position_omits_unknown_duration() {
    let ev = HostEvent::UpdateFilePosition(FilePosition {
        position: 1.0,
        duration: None,
        file_index: 0,
    });
    let v = as_value(&ev);
    assert!(v["payload"].get("duration").is_none());
}

#[test]
fn set_volume_keeps_host_spelling_and_bare_number() {
    let v = as_value(&HostEvent::SetVolume(0.25));
    assert_eq!(v, json!({ "event": "set_volumn", "payload": 0.25 }));
}

#[test]
fn work_time_payload_shape() {
    let v = as_value(&HostEvent::UpdateWorkTime(WorkTime {
        work_id: "works_dune".into(),
        position: 42.0,
    }));
    assert_eq!(
        v,
        json!({ "event": "update_work_time", "payload": { "workId": "works_dune", "position": 42.0 } })
    );
}

#[test]
fn metadata_payload_carries_tags_and_seconds() {
    let mut segment = Segment::new(
        "/books/dune/01.m4b",
        Duration::from_millis(90_500),
        vec![Chapter::new(Some("Prologue".into()), Duration::from_millis(90_500))],
    );
    segment.track_title = Some("Prologue".into());
    segment.track_author = Some("Frank Herbert".into());
    let v = as_value(&HostEvent::MetadataLoaded(vec![segment]));
    assert_eq!(
        v,
        json!({
            "event": "metadata_loaded",
            "payload": [{
                "path": "/books/dune/01.m4b",
                "duration": 90.5,
                "chapters": [{ "title": "Prologue", "length": 90.5 }],
                "trackTitle": "Prologue",
                "trackAuthor": "Frank Herbert",
                "albumTitle": null
            }]
        })
    );
}

#[test]
fn parses_set_position_command() {
    let cmd =
        UiCommand::from_json_line(r#"{"event":"set_position","payload":{"position":12,"index":1}}"#)
            .unwrap();
    assert_eq!(
        cmd,
        UiCommand::SetPosition(SetFilePosition {
            position: 12.0,
            index: 1
        })
    );
}

#[test]
fn parses_payloadless_commands() {
    assert_eq!(
        UiCommand::from_json_line(r#"{"event":"play"}"#).unwrap(),
        UiCommand::Play
    );
    assert_eq!(
        UiCommand::from_json_line("  {\"event\":\"forward\"}\n").unwrap(),
        UiCommand::Forward
    );
}

#[test]
fn parses_scalar_payloads() {
    assert_eq!(
        UiCommand::from_json_line(r#"{"event":"set_volume","payload":0.5}"#).unwrap(),
        UiCommand::SetVolume(0.5)
    );
    assert_eq!(
        UiCommand::from_json_line(r#"{"event":"set_muted","payload":true}"#).unwrap(),
        UiCommand::SetMuted(true)
    );
    assert_eq!(
        UiCommand::from_json_line(r#"{"event":"seek","payload":{"position":99.5}}"#).unwrap(),
        UiCommand::Seek(GlobalSeek { position: 99.5 })
    );
}

#[test]
fn rejects_unknown_or_malformed_commands() {
    assert!(UiCommand::from_json_line(r#"{"event":"explode"}"#).is_err());
    assert!(UiCommand::from_json_line("not json").is_err());
    assert!(UiCommand::from_json_line(r#"{"event":"set_position","payload":{}}"#).is_err());
}

#[test]
fn parses_status_request() {
    assert_eq!(
        UiCommand::from_json_line(r#"{"event":"status"}"#).unwrap(),
        UiCommand::Status
    );
}

#[test]
fn status_payload_uses_camel_case() {
    let v = as_value(&HostEvent::Status(PlayerStatus {
        ready: true,
        playing: false,
        segment_index: 1,
        position: 150.0,
        duration: 600.0,
        position_percentage: 25.0,
        volume_percentage: 100.0,
        muted: false,
        position_formatted: "02:30".into(),
        duration_formatted: "10:00".into(),
        chapters: vec![OverlaySegment { start: 0.0, end: 50.0 }],
    }));
    assert_eq!(v["event"], "status");
    assert_eq!(v["payload"]["segmentIndex"], 1);
    assert_eq!(v["payload"]["positionPercentage"], 25.0);
    assert_eq!(v["payload"]["chapters"][0], json!({ "start": 0.0, "end": 50.0 }));
}
