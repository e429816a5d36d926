use crate::{
    ast::{
        EnumTypeDefinition, Field, FieldDefinition, InterfaceTypeDefinition, NamedType, NodeKind, NodeRef,
        ObjectTypeDefinition, UnionTypeDefinition,
    },
    SchemaTransformError,
};

/// The kinds of nodes [rename_node] accepts.
pub(crate) const RENAMEABLE_KINDS: &[NodeKind] = &[
    NodeKind::EnumTypeDefinition,
    NodeKind::Field,
    NodeKind::FieldDefinition,
    NodeKind::InterfaceTypeDefinition,
    NodeKind::NamedType,
    NodeKind::ObjectTypeDefinition,
    NodeKind::UnionTypeDefinition,
];

/// A node with a name that renaming and merging may change.
pub trait Rename: Sized {
    /// A copy of the node with a different name. Every other attribute, children included, is
    /// shared with `self`.
    fn renamed(&self, new_name: &str) -> Self;
}

macro_rules! impl_rename {
    ($($node:ty),*) => {
        $(
            impl Rename for $node {
                fn renamed(&self, new_name: &str) -> Self {
                    Self {
                        name: new_name.into(),
                        ..self.clone()
                    }
                }
            }
        )*
    };
}

impl_rename!(
    EnumTypeDefinition,
    InterfaceTypeDefinition,
    ObjectTypeDefinition,
    UnionTypeDefinition,
    NamedType,
    Field,
    FieldDefinition
);

/// The result of [rename_node]: a node of the same kind as its input.
#[derive(Debug, Clone, PartialEq)]
pub enum RenameableNode {
    EnumTypeDefinition(EnumTypeDefinition),
    InterfaceTypeDefinition(InterfaceTypeDefinition),
    ObjectTypeDefinition(ObjectTypeDefinition),
    UnionTypeDefinition(UnionTypeDefinition),
    NamedType(NamedType),
    Field(Field),
    FieldDefinition(FieldDefinition),
}

impl RenameableNode {
    pub fn as_node(&self) -> NodeRef<'_> {
        match self {
            RenameableNode::EnumTypeDefinition(node) => NodeRef::EnumTypeDefinition(node),
            RenameableNode::InterfaceTypeDefinition(node) => NodeRef::InterfaceTypeDefinition(node),
            RenameableNode::ObjectTypeDefinition(node) => NodeRef::ObjectTypeDefinition(node),
            RenameableNode::UnionTypeDefinition(node) => NodeRef::UnionTypeDefinition(node),
            RenameableNode::NamedType(node) => NodeRef::NamedType(node),
            RenameableNode::Field(node) => NodeRef::Field(node),
            RenameableNode::FieldDefinition(node) => NodeRef::FieldDefinition(node),
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.as_node().kind()
    }

    pub fn name(&self) -> &str {
        match self {
            RenameableNode::EnumTypeDefinition(node) => &node.name,
            RenameableNode::InterfaceTypeDefinition(node) => &node.name,
            RenameableNode::ObjectTypeDefinition(node) => &node.name,
            RenameableNode::UnionTypeDefinition(node) => &node.name,
            RenameableNode::NamedType(node) => &node.name,
            RenameableNode::Field(node) => &node.name,
            RenameableNode::FieldDefinition(node) => &node.name,
        }
    }
}

/// Copy a node under a new name. `node` is left untouched.
///
/// Only enum, interface, object and union type definitions, named type references, query fields
/// and field definitions can be renamed. Any other kind of node is a caller bug, reported as
/// [SchemaTransformError::UnsupportedNodeKind].
pub fn rename_node(node: NodeRef<'_>, new_name: &str) -> Result<RenameableNode, SchemaTransformError> {
    let renamed = match node {
        NodeRef::EnumTypeDefinition(node) => RenameableNode::EnumTypeDefinition(node.renamed(new_name)),
        NodeRef::InterfaceTypeDefinition(node) => RenameableNode::InterfaceTypeDefinition(node.renamed(new_name)),
        NodeRef::ObjectTypeDefinition(node) => RenameableNode::ObjectTypeDefinition(node.renamed(new_name)),
        NodeRef::UnionTypeDefinition(node) => RenameableNode::UnionTypeDefinition(node.renamed(new_name)),
        NodeRef::NamedType(node) => RenameableNode::NamedType(node.renamed(new_name)),
        NodeRef::Field(node) => RenameableNode::Field(node.renamed(new_name)),
        NodeRef::FieldDefinition(node) => RenameableNode::FieldDefinition(node.renamed(new_name)),
        other => return Err(SchemaTransformError::UnsupportedNodeKind { kind: other.kind() }),
    };

    Ok(renamed)
}
