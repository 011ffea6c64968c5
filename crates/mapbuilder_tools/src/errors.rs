use mapbuilder_xaml::XamlError;

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("XAML error: {0}")]
    Xaml(#[from] XamlError),
    #[error("No command registered for '{id}'")]
    UnknownCommand { id: String },
    #[error("Command error: {0}")]
    Command(String),
    #[error("Missing <{element}>")]
    MissingElement { element: String },
    #[error("Unexpected root <{found}>, expected <{expected}>")]
    UnexpectedRoot { expected: &'static str, found: String },
}

pub type ToolResult<T> = Result<T, ToolError>;
