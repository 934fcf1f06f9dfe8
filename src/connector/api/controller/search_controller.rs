use anyhow::Result;

use crate::application::SearchOptions;
use crate::cli::OutputFormat;
use crate::domain::ConnectorId;

use super::super::Container;
use super::format_items;

pub struct SearchController<'a> {
    container: &'a Container,
}

impl<'a> SearchController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn search(
        &self,
        connector: ConnectorId,
        query: String,
        num: Option<usize>,
        format: OutputFormat,
    ) -> Result<String> {
        let use_case = self.container.search_use_case();
        let limit = num.unwrap_or_else(|| use_case.default_limit());
        let items = use_case
            .execute(connector, &query, SearchOptions::new(limit))
            .await?;

        Ok(match format {
            OutputFormat::Json => serde_json::to_string_pretty(&items)?,
            OutputFormat::Text if items.is_empty() => {
                format!("No results for \"{}\".", query)
            }
            OutputFormat::Text => format!(
                "Found {} {} results for \"{}\":\n\n{}",
                items.len(),
                connector.display_name(),
                query,
                format_items(&items, connector.provider_initial())
            ),
        })
    }
}
