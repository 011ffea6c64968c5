use mapbuilder_json::JsonError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PopupError {
    #[error(transparent)]
    Json(#[from] JsonError),

    #[error("Popup configuration must be an object, found {found}")]
    NotAnObject { found: &'static str },

    #[error("Invalid popup property '{key}': expected {expected}")]
    InvalidProperty { key: String, expected: &'static str },
}

pub type PopupResult<T> = Result<T, PopupError>;
