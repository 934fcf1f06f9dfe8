use clap::{Subcommand, ValueEnum};

use crate::domain::ConnectorId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the registered connectors and their trigger prefixes
    Connectors {
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Find the connector trigger ending at the caret
    Parse {
        text: String,

        /// Caret byte offset (defaults to the end of the text)
        #[arg(short, long)]
        caret: Option<usize>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Search one connector
    Search {
        connector: ConnectorId,

        #[arg(default_value = "")]
        query: String,

        #[arg(long)]
        num: Option<usize>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Resolve the trigger at the caret and insert the picked result as a reference token
    Complete {
        text: String,

        #[arg(short, long)]
        caret: Option<usize>,

        /// Index of the result to insert
        #[arg(short, long, default_value = "0")]
        pick: usize,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Quick-create a resource on a connector from a JSON payload
    Create {
        connector: ConnectorId,

        payload: String,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Interactive chat input with connector typeahead
    Chat,
}
