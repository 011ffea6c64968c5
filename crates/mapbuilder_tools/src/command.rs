use crate::errors::ToolResult;
use std::fmt;

/// Fully qualified XAML class of a tool command, e.g. `local:OpenCommand`
/// where `local` maps to `clr-namespace:My.Tools;assembly=My.Tools`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ClassName {
    pub prefix: String,
    pub namespace: String,
    pub name: String,
}

impl ClassName {
    pub fn new(prefix: impl Into<String>, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Registry key, stable across prefix renames.
    pub fn id(&self) -> String {
        format!("{}#{}", self.namespace, self.name)
    }

    /// Element name as written in `Tool.Class`.
    pub fn qualified_name(&self) -> String {
        if self.prefix.is_empty() {
            self.name.clone()
        } else {
            format!("{}:{}", self.prefix, self.name)
        }
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

/// A command that can carry its own settings in `Tool.ConfigData`.
pub trait SupportsConfiguration {
    fn load_configuration(&mut self, config: &str) -> ToolResult<()>;
    fn save_configuration(&self) -> ToolResult<String>;
}

/// A tool command instance created from its class descriptor.
pub trait Command: fmt::Debug {
    fn class_name(&self) -> &ClassName;

    fn configuration(&self) -> Option<&dyn SupportsConfiguration> {
        None
    }

    fn configuration_mut(&mut self) -> Option<&mut dyn SupportsConfiguration> {
        None
    }
}

/// Stand-in for commands whose implementation is not available. It keeps
/// the configuration blob verbatim so the document saves unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct OpaqueCommand {
    class_name: ClassName,
    config: Option<String>,
}

impl OpaqueCommand {
    pub fn new(class_name: ClassName) -> Self {
        Self {
            class_name,
            config: None,
        }
    }

    pub fn config(&self) -> Option<&str> {
        self.config.as_deref()
    }
}

impl Command for OpaqueCommand {
    fn class_name(&self) -> &ClassName {
        &self.class_name
    }

    fn configuration(&self) -> Option<&dyn SupportsConfiguration> {
        Some(self)
    }

    fn configuration_mut(&mut self) -> Option<&mut dyn SupportsConfiguration> {
        Some(self)
    }
}

impl SupportsConfiguration for OpaqueCommand {
    fn load_configuration(&mut self, config: &str) -> ToolResult<()> {
        self.config = Some(config.to_string());
        Ok(())
    }

    fn save_configuration(&self) -> ToolResult<String> {
        Ok(self.config.clone().unwrap_or_default())
    }
}
