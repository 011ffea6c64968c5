use crate::command::{ClassName, Command, OpaqueCommand};
use crate::errors::{ToolError, ToolResult};
use std::collections::HashMap;

pub type CommandFactory = Box<dyn Fn(&ClassName) -> ToolResult<Box<dyn Command>>>;

/// Host-provided lookup from class id (`namespace#Name`) to constructor.
#[derive(Default)]
pub struct CommandRegistry {
    factories: HashMap<String, CommandFactory>,
    pass_through: bool,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry that turns every unknown class into an [`OpaqueCommand`].
    pub fn pass_through() -> Self {
        Self {
            factories: HashMap::new(),
            pass_through: true,
        }
    }

    pub fn register(
        &mut self,
        namespace: &str,
        name: &str,
        factory: impl Fn(&ClassName) -> ToolResult<Box<dyn Command>> + 'static,
    ) {
        let id = ClassName::new("", namespace, name).id();
        self.factories.insert(id, Box::new(factory));
    }

    pub fn contains(&self, class_name: &ClassName) -> bool {
        self.factories.contains_key(&class_name.id())
    }

    pub fn instantiate(&self, class_name: &ClassName) -> ToolResult<Box<dyn Command>> {
        match self.factories.get(&class_name.id()) {
            Some(factory) => factory(class_name),
            None if self.pass_through => Ok(Box::new(OpaqueCommand::new(class_name.clone()))),
            None => Err(ToolError::UnknownCommand { id: class_name.id() }),
        }
    }
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<_> = self.factories.keys().collect();
        ids.sort();
        f.debug_struct("CommandRegistry")
            .field("factories", &ids)
            .field("pass_through", &self.pass_through)
            .finish()
    }
}
