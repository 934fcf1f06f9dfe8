use anyhow::{Context, Result};
use serde_json::{Map, Value};

use crate::cli::OutputFormat;
use crate::domain::ConnectorId;

use super::super::Container;

pub struct CreateController<'a> {
    container: &'a Container,
}

impl<'a> CreateController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn create(
        &self,
        connector: ConnectorId,
        payload: String,
        format: OutputFormat,
    ) -> Result<String> {
        let payload: Map<String, Value> =
            serde_json::from_str(&payload).context("payload must be a JSON object")?;

        let adapter = self
            .container
            .registry()
            .get(connector)
            .with_context(|| format!("connector '{}' is not registered", connector))?;
        let created = adapter.quick_create(payload).await?;

        Ok(match format {
            OutputFormat::Json => serde_json::to_string_pretty(&created)?,
            OutputFormat::Text => {
                let mut output = format!("Created {} {}", adapter.display_name(), created.id());
                if let Some(title) = created.title() {
                    output.push_str(&format!(": {}", title));
                }
                if let Some(url) = created.url() {
                    output.push_str(&format!("\n{}", url));
                }
                output
            }
        })
    }
}
