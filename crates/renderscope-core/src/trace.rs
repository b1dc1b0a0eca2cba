//! Render trace files.
//!
//! A trace is JSON lines, one render per line, in time order:
//!
//! ```text
//! # recorded from the offers page
//! {"component": "Header", "at_ms": 0.0}
//! {"component": "OfferCard", "at_ms": 4.5, "props": {"id": 7}}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use crate::error::TraceError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// One recorded render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEvent {
    /// Component that rendered
    pub component: String,
    /// Time of the render
    pub at_ms: f64,
    /// Props at the time of the render
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<Value>,
}

/// Parse a trace from its text.
pub fn parse_trace(input: &str) -> Result<Vec<TraceEvent>, TraceError> {
    let mut events: Vec<TraceEvent> = Vec::new();

    for (index, raw) in input.lines().enumerate() {
        let line = index + 1;
        let text = raw.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }

        let event: TraceEvent =
            serde_json::from_str(text).map_err(|source| TraceError::Parse { line, source })?;

        if event.component.is_empty() {
            return Err(TraceError::InvalidEvent {
                line,
                reason: "empty component name".to_string(),
            });
        }
        if !event.at_ms.is_finite() {
            return Err(TraceError::InvalidEvent {
                line,
                reason: format!("timestamp {} is not finite", event.at_ms),
            });
        }
        if let Some(previous) = events.last() {
            if event.at_ms < previous.at_ms {
                return Err(TraceError::InvalidEvent {
                    line,
                    reason: format!(
                        "timestamp {} is earlier than the previous event at {}",
                        event.at_ms, previous.at_ms
                    ),
                });
            }
        }

        events.push(event);
    }

    Ok(events)
}

/// Read and parse a trace file.
pub fn read_trace(path: &Path) -> Result<Vec<TraceEvent>, TraceError> {
    let contents = std::fs::read_to_string(path)?;
    parse_trace(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_events_with_comments_and_blanks() {
        let input = r#"
# header comment
{"component": "Header", "at_ms": 0}

{"component": "Card", "at_ms": 4.5, "props": {"id": 7}}
"#;
        let events = parse_trace(input).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].component, "Header");
        assert_eq!(events[0].props, None);
        assert_eq!(events[1].at_ms, 4.5);
        assert_eq!(events[1].props, Some(json!({ "id": 7 })));
    }

    #[test]
    fn test_parse_error_reports_line() {
        let input = "{\"component\": \"A\", \"at_ms\": 0}\nnot json\n";
        let err = parse_trace(input).unwrap_err();
        assert!(matches!(err, TraceError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_empty_component_is_invalid() {
        let err = parse_trace(r#"{"component": "", "at_ms": 1}"#).unwrap_err();
        assert!(matches!(err, TraceError::InvalidEvent { line: 1, .. }));
    }

    #[test]
    fn test_backwards_time_is_invalid() {
        let input = "{\"component\": \"A\", \"at_ms\": 10}\n{\"component\": \"A\", \"at_ms\": 5}\n";
        let err = parse_trace(input).unwrap_err();
        assert!(err.to_string().contains("earlier than the previous event"));
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_trace("").unwrap().is_empty());
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_trace(Path::new("/nonexistent/trace.jsonl")).unwrap_err();
        assert!(matches!(err, TraceError::Io(_)));
    }

    #[test]
    fn test_event_serialization_skips_missing_props() {
        let event = TraceEvent {
            component: "A".to_string(),
            at_ms: 1.0,
            props: None,
        };
        assert_eq!(
            serde_json::to_string(&event).unwrap(),
            r#"{"component":"A","at_ms":1.0}"#
        );
    }
}
