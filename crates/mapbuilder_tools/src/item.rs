use crate::command::{ClassName, Command};
use uuid::Uuid;

/// Label, icon and description shown on a tool button.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ToolDescriptor {
    pub label: Option<String>,
    pub icon: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug)]
pub struct ToolItem {
    pub id: Uuid,
    pub descriptor: ToolDescriptor,
    /// Attributes set on the class element itself, kept verbatim.
    pub class_attributes: Vec<(String, String)>,
    pub command: Box<dyn Command>,
}

impl ToolItem {
    pub fn new(descriptor: ToolDescriptor, command: Box<dyn Command>) -> Self {
        Self {
            id: Uuid::new_v4(),
            descriptor,
            class_attributes: Vec::new(),
            command,
        }
    }

    pub fn class_name(&self) -> &ClassName {
        self.command.class_name()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    /// Drop-down button.
    Menu,
    Group,
}

impl GroupKind {
    pub fn element_name(&self) -> &'static str {
        match self {
            GroupKind::Menu => "Menu",
            GroupKind::Group => "Group",
        }
    }
}

#[derive(Debug)]
pub struct ToolGroup {
    pub id: Uuid,
    pub kind: GroupKind,
    pub descriptor: ToolDescriptor,
    pub items: Vec<ToolPanelItem>,
}

impl ToolGroup {
    pub fn new(kind: GroupKind, descriptor: ToolDescriptor) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            descriptor,
            items: Vec::new(),
        }
    }
}

#[derive(Debug)]
pub enum ToolPanelItem {
    Tool(ToolItem),
    Group(ToolGroup),
    Separator(Uuid),
}

impl ToolPanelItem {
    pub fn separator() -> Self {
        ToolPanelItem::Separator(Uuid::new_v4())
    }

    pub fn id(&self) -> Uuid {
        match self {
            ToolPanelItem::Tool(t) => t.id,
            ToolPanelItem::Group(g) => g.id,
            ToolPanelItem::Separator(id) => *id,
        }
    }
}

/// Depth-first search through nested groups.
pub fn find_item(items: &[ToolPanelItem], id: Uuid) -> Option<&ToolPanelItem> {
    for item in items {
        if item.id() == id {
            return Some(item);
        }
        if let ToolPanelItem::Group(group) = item {
            if let Some(found) = find_item(&group.items, id) {
                return Some(found);
            }
        }
    }
    None
}

pub fn remove_item(items: &mut Vec<ToolPanelItem>, id: Uuid) -> Option<ToolPanelItem> {
    if let Some(pos) = items.iter().position(|item| item.id() == id) {
        return Some(items.remove(pos));
    }
    items.iter_mut().find_map(|item| match item {
        ToolPanelItem::Group(group) => remove_item(&mut group.items, id),
        _ => None,
    })
}
