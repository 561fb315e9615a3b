use super::{Formatter, iso8601_timestamp};
use crate::heading::HeadingEvent;

pub struct TextFormatter {
    verbose: bool,
}

impl TextFormatter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, event: &HeadingEvent) -> String {
        if self.verbose {
            format!(
                "[{}] Heading: {:>3}° (accuracy: {:.1})",
                iso8601_timestamp(),
                event.heading,
                event.accuracy
            )
        } else {
            format!("Heading: {:>3}°", event.heading)
        }
    }
}
