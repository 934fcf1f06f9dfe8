use anyhow::Result;

use crate::cli::OutputFormat;

use super::super::Container;

pub struct ParseController<'a> {
    container: &'a Container,
}

impl<'a> ParseController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub fn parse(&self, text: String, caret: Option<usize>, format: OutputFormat) -> Result<String> {
        let caret = caret.unwrap_or(text.len());
        let trigger = self
            .container
            .registry()
            .parse_trigger_at_caret(&text, caret);

        Ok(match (format, trigger) {
            (OutputFormat::Json, trigger) => serde_json::to_string_pretty(&trigger)?,
            (OutputFormat::Text, None) => format!("No connector trigger at offset {}.", caret),
            (OutputFormat::Text, Some(trigger)) => format!(
                "Connector: {}\nQuery:     \"{}\"\nStart:     {}",
                trigger.connector(),
                trigger.query(),
                trigger.start()
            ),
        })
    }
}
