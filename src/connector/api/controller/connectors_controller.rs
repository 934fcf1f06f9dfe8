use anyhow::Result;
use serde_json::json;

use crate::cli::OutputFormat;

use super::super::Container;

pub struct ConnectorsController<'a> {
    container: &'a Container,
}

impl<'a> ConnectorsController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub fn list(&self, format: OutputFormat) -> Result<String> {
        let adapters = self.container.registry().adapters();

        Ok(match format {
            OutputFormat::Json => {
                let rows: Vec<_> = adapters
                    .iter()
                    .map(|a| {
                        json!({
                            "id": a.id(),
                            "prefix": a.prefix(),
                            "name": a.display_name(),
                        })
                    })
                    .collect();
                serde_json::to_string_pretty(&rows)?
            }
            OutputFormat::Text => {
                if adapters.is_empty() {
                    return Ok("No connectors registered.".to_string());
                }
                let mut output = "Registered connectors:\n\n".to_string();
                for adapter in adapters {
                    output.push_str(&format!(
                        "  {:<12} {:<14} {}\n",
                        adapter.id(),
                        adapter.prefix(),
                        adapter.display_name()
                    ));
                }
                output
            }
        })
    }
}
