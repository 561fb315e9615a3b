use serde::Serialize;

use super::{Formatter, iso8601_timestamp};
use crate::heading::{HEADING_UPDATED, HeadingEvent};

pub struct JsonFormatter;

#[derive(Serialize)]
struct JsonLine<'a> {
    ts: String,
    event: &'a str,
    #[serde(flatten)]
    payload: &'a HeadingEvent,
}

impl Formatter for JsonFormatter {
    fn format(&self, event: &HeadingEvent) -> String {
        let line = JsonLine {
            ts: iso8601_timestamp(),
            event: HEADING_UPDATED,
            payload: event,
        };
        serde_json::to_string(&line).unwrap_or_else(|e| {
            log::warn!("Failed to serialize heading event: {}", e);
            String::new()
        })
    }
}
