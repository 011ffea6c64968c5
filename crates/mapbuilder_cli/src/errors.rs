use mapbuilder_json::JsonError;
use mapbuilder_popup::PopupError;
use mapbuilder_tools::ToolError;
use mapbuilder_xaml::XamlError;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid {what} in {path:?}: {source}")]
    Serde {
        what: &'static str,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Json(#[from] JsonError),
    #[error(transparent)]
    Xaml(#[from] XamlError),
    #[error(transparent)]
    Tool(#[from] ToolError),
    #[error(transparent)]
    Popup(#[from] PopupError),
}

pub type CliResult<T> = Result<T, CliError>;
