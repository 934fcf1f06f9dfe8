use anyhow::{bail, Result};

use crate::Commands;

use super::container::Container;
use super::controller::{
    CompleteController, ConnectorsController, CreateController, ParseController, SearchController,
};

pub struct Router<'a> {
    connectors_controller: ConnectorsController<'a>,
    parse_controller: ParseController<'a>,
    search_controller: SearchController<'a>,
    complete_controller: CompleteController<'a>,
    create_controller: CreateController<'a>,
}

impl<'a> Router<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self {
            connectors_controller: ConnectorsController::new(container),
            parse_controller: ParseController::new(container),
            search_controller: SearchController::new(container),
            complete_controller: CompleteController::new(container),
            create_controller: CreateController::new(container),
        }
    }

    pub async fn route(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Connectors { format } => self.connectors_controller.list(format),
            Commands::Parse {
                text,
                caret,
                format,
            } => self.parse_controller.parse(text, caret, format),
            Commands::Search {
                connector,
                query,
                num,
                format,
            } => {
                self.search_controller
                    .search(connector, query, num, format)
                    .await
            }
            Commands::Complete {
                text,
                caret,
                pick,
                format,
            } => {
                self.complete_controller
                    .complete(text, caret, pick, format)
                    .await
            }
            Commands::Create {
                connector,
                payload,
                format,
            } => {
                self.create_controller
                    .create(connector, payload, format)
                    .await
            }
            Commands::Chat => bail!("the chat command runs the terminal UI and is not routed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use crate::connector::api::ContainerConfig;
    use crate::domain::ConnectorId;

    fn container() -> Container {
        Container::new(ContainerConfig {
            mock_connectors: true,
            ..ContainerConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_complete_inserts_jira_token() {
        let container = container();
        let router = Router::new(&container);

        let output = router
            .route(Commands::Complete {
                text: "Please see @jira_TEST-1".to_string(),
                caret: None,
                pick: 0,
                format: OutputFormat::Json,
            })
            .await
            .unwrap();

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["text"], "Please see [@jira TEST-1] ");
        assert_eq!(value["reference"]["id"], "TEST-1");
        assert_eq!(value["reference"]["connector"], "jira");
    }

    #[tokio::test]
    async fn test_complete_without_trigger_fails() {
        let container = container();
        let router = Router::new(&container);

        let result = router
            .route(Commands::Complete {
                text: "email@jira_ABC".to_string(),
                caret: None,
                pick: 0,
                format: OutputFormat::Text,
            })
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_parse_reports_trigger() {
        let container = container();
        let router = Router::new(&container);

        let output = router
            .route(Commands::Parse {
                text: "Link @confluence_ProjectXYZ".to_string(),
                caret: None,
                format: OutputFormat::Text,
            })
            .await
            .unwrap();

        assert!(output.contains("confluence"));
        assert!(output.contains("\"ProjectXYZ\""));
        assert!(output.contains("Start:     5"));
    }

    #[tokio::test]
    async fn test_search_text_output() {
        let container = container();
        let router = Router::new(&container);

        let output = router
            .route(Commands::Search {
                connector: ConnectorId::Confluence,
                query: "runbook".to_string(),
                num: None,
                format: OutputFormat::Text,
            })
            .await
            .unwrap();

        assert!(output.starts_with("Found 1 Confluence results"));
        assert!(output.contains("[C] 65822  Incident Runbook  (page)"));
    }

    #[tokio::test]
    async fn test_create_rejects_non_object_payload() {
        let container = container();
        let router = Router::new(&container);

        let result = router
            .route(Commands::Create {
                connector: ConnectorId::Jira,
                payload: "[1, 2]".to_string(),
                format: OutputFormat::Text,
            })
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_connectors_json() {
        let container = container();
        let router = Router::new(&container);

        let output = router
            .route(Commands::Connectors {
                format: OutputFormat::Json,
            })
            .await
            .unwrap();

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[0]["prefix"], "@jira_");
        assert_eq!(value[1]["name"], "Confluence");
    }
}
