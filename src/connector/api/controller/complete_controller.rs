use anyhow::{bail, Result};
use serde_json::json;

use crate::cli::OutputFormat;
use crate::domain::{compose_reference, floor_char_boundary, Selection};

use super::super::Container;
use super::format_items;

pub struct CompleteController<'a> {
    container: &'a Container,
}

impl<'a> CompleteController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    /// Resolve the trigger at the caret, search its connector and insert the
    /// `pick`-th result the way the chat input would on Enter.
    pub async fn complete(
        &self,
        text: String,
        caret: Option<usize>,
        pick: usize,
        format: OutputFormat,
    ) -> Result<String> {
        let caret = floor_char_boundary(&text, caret.unwrap_or(text.len()));
        let Some(trigger) = self
            .container
            .registry()
            .parse_trigger_at_caret(&text, caret)
        else {
            bail!("No connector trigger at offset {}", caret);
        };

        let use_case = self.container.search_use_case();
        let items = use_case.search(trigger.connector(), trigger.query()).await?;

        let Some(item) = items.get(pick).cloned() else {
            if items.is_empty() {
                bail!("No results for \"{}\"", trigger.query());
            }
            bail!(
                "Result {} out of range; {} results:\n\n{}",
                pick,
                items.len(),
                format_items(&items, trigger.connector().provider_initial())
            );
        };

        let selection = Selection::new(trigger.connector(), item);
        let composed = compose_reference(&text, caret, &trigger, &selection.reference);

        Ok(match format {
            OutputFormat::Json => serde_json::to_string_pretty(&json!({
                "text": composed.text,
                "caret": composed.caret,
                "reference": selection.reference,
            }))?,
            OutputFormat::Text => format!(
                "{}\n\nReference: {} {} ({})",
                composed.text,
                selection.reference.connector(),
                selection.reference.id(),
                selection.reference.url()
            ),
        })
    }
}
