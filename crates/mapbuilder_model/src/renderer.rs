use crate::symbol::Symbol;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimpleRenderer {
    pub symbol: Option<Symbol>,
    pub label: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UniqueValueInfo {
    pub value: String,
    pub label: Option<String>,
    pub description: Option<String>,
    pub symbol: Option<Symbol>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UniqueValueRenderer {
    pub field: String,
    pub default_label: Option<String>,
    pub default_symbol: Option<Symbol>,
    pub infos: Vec<UniqueValueInfo>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassBreakInfo {
    pub minimum_value: f64,
    pub maximum_value: f64,
    pub label: Option<String>,
    pub description: Option<String>,
    pub symbol: Option<Symbol>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassBreaksRenderer {
    pub field: String,
    pub default_label: Option<String>,
    pub default_symbol: Option<Symbol>,
    pub classes: Vec<ClassBreakInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Renderer {
    Simple(SimpleRenderer),
    UniqueValue(UniqueValueRenderer),
    ClassBreaks(ClassBreaksRenderer),
}

impl Renderer {
    /// Every symbol referenced by the renderer, default symbols included.
    pub fn symbols(&self) -> Vec<&Symbol> {
        match self {
            Renderer::Simple(r) => r.symbol.iter().collect(),
            Renderer::UniqueValue(r) => r
                .default_symbol
                .iter()
                .chain(r.infos.iter().filter_map(|i| i.symbol.as_ref()))
                .collect(),
            Renderer::ClassBreaks(r) => r
                .default_symbol
                .iter()
                .chain(r.classes.iter().filter_map(|c| c.symbol.as_ref()))
                .collect(),
        }
    }

    /// A renderer is only written when every symbol it holds can be written.
    pub fn is_serializable(&self) -> bool {
        self.symbols().iter().all(|s| s.is_serializable())
    }
}
