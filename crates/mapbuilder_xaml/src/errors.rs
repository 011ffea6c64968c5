use mapbuilder_json::JsonError;

#[derive(Debug, thiserror::Error)]
pub enum XamlError {
    #[error("XML error: {0}")]
    Xml(String),
    #[error("JSON error: {0}")]
    Json(#[from] JsonError),
    #[error("Clusterer type '{type_name}' cannot be written")]
    UnsupportedClusterer { type_name: String },
    #[error("Symbol type '{type_name}' cannot be written")]
    UnserializableSymbol { type_name: String },
    #[error("Unknown layer element <{name}>")]
    UnknownLayerElement { name: String },
    #[error("Invalid value '{value}' for {element}.{attribute}")]
    InvalidAttribute {
        element: String,
        attribute: String,
        value: String,
    },
    #[error("Missing <{element}>")]
    MissingElement { element: String },
}

impl XamlError {
    pub fn invalid_attribute(element: &str, attribute: &str, value: &str) -> Self {
        XamlError::InvalidAttribute {
            element: element.to_string(),
            attribute: attribute.to_string(),
            value: value.to_string(),
        }
    }

    pub fn missing(element: impl Into<String>) -> Self {
        XamlError::MissingElement { element: element.into() }
    }
}

impl From<quick_xml::Error> for XamlError {
    fn from(err: quick_xml::Error) -> Self {
        XamlError::Xml(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for XamlError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        XamlError::Xml(err.to_string())
    }
}

impl From<std::io::Error> for XamlError {
    fn from(err: std::io::Error) -> Self {
        XamlError::Xml(err.to_string())
    }
}

impl From<std::string::FromUtf8Error> for XamlError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        XamlError::Xml(err.to_string())
    }
}

pub type XamlResult<T> = Result<T, XamlError>;
