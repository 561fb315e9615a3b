use super::{Formatter, iso8601_timestamp};
use crate::heading::HeadingEvent;

pub struct CsvFormatter;

impl Formatter for CsvFormatter {
    fn format(&self, event: &HeadingEvent) -> String {
        format!(
            "{},{},{:.1}",
            iso8601_timestamp(),
            event.heading,
            event.accuracy
        )
    }

    fn header(&self) -> Option<&'static str> {
        Some("ts,heading,accuracy")
    }
}
