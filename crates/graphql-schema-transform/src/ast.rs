//! The GraphQL document AST the checks in this crate operate on.
//!
//! A [Document] can hold type system definitions and executable definitions side by side, so the
//! structural validator can reject query nodes that end up in a schema document.
//!
//! Nodes are immutable. Child collections are `Arc<[T]>` and nested nodes are `Arc<T>`: cloning a
//! node is shallow, and a renamed copy shares every subtree with the node it was made from.

pub mod ingest;
pub mod visit;

use std::{fmt, sync::Arc};

/// A GraphQL name.
pub type Name = Arc<str>;

/// A GraphQL document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub definitions: Arc<[Definition]>,
}

impl Document {
    pub fn new(definitions: impl IntoIterator<Item = Definition>) -> Self {
        definitions.into_iter().collect()
    }

    /// Iterate over the type definitions of the document, skipping extensions.
    pub fn type_definitions(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.definitions.iter().filter_map(|definition| match definition {
            Definition::Type(ty) => Some(ty),
            _ => None,
        })
    }

    pub fn operations(&self) -> impl Iterator<Item = &OperationDefinition> {
        self.definitions.iter().filter_map(|definition| match definition {
            Definition::Operation(operation) => Some(operation),
            _ => None,
        })
    }

    pub fn fragments(&self) -> impl Iterator<Item = &FragmentDefinition> {
        self.definitions.iter().filter_map(|definition| match definition {
            Definition::Fragment(fragment) => Some(fragment),
            _ => None,
        })
    }

    /// Find the type definition with the given name.
    pub fn type_definition(&self, name: &str) -> Option<&TypeDefinition> {
        self.type_definitions().find(|ty| ty.name() == name)
    }
}

impl FromIterator<Definition> for Document {
    fn from_iter<T: IntoIterator<Item = Definition>>(iter: T) -> Self {
        Document {
            definitions: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Definition {
    Schema(SchemaDefinition),
    Type(TypeDefinition),
    TypeExtension(TypeExtension),
    Directive(DirectiveDefinition),
    Operation(OperationDefinition),
    Fragment(FragmentDefinition),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDefinition {
    pub directives: Arc<[Directive]>,
    pub query: Option<NamedType>,
    pub mutation: Option<NamedType>,
    pub subscription: Option<NamedType>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeDefinition {
    Scalar(ScalarTypeDefinition),
    Object(ObjectTypeDefinition),
    Interface(InterfaceTypeDefinition),
    Union(UnionTypeDefinition),
    Enum(EnumTypeDefinition),
    InputObject(InputObjectTypeDefinition),
}

impl TypeDefinition {
    pub fn name(&self) -> &str {
        match self {
            TypeDefinition::Scalar(ty) => &ty.name,
            TypeDefinition::Object(ty) => &ty.name,
            TypeDefinition::Interface(ty) => &ty.name,
            TypeDefinition::Union(ty) => &ty.name,
            TypeDefinition::Enum(ty) => &ty.name,
            TypeDefinition::InputObject(ty) => &ty.name,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.as_node().kind()
    }

    pub fn as_node(&self) -> NodeRef<'_> {
        match self {
            TypeDefinition::Scalar(ty) => NodeRef::ScalarTypeDefinition(ty),
            TypeDefinition::Object(ty) => NodeRef::ObjectTypeDefinition(ty),
            TypeDefinition::Interface(ty) => NodeRef::InterfaceTypeDefinition(ty),
            TypeDefinition::Union(ty) => NodeRef::UnionTypeDefinition(ty),
            TypeDefinition::Enum(ty) => NodeRef::EnumTypeDefinition(ty),
            TypeDefinition::InputObject(ty) => NodeRef::InputObjectTypeDefinition(ty),
        }
    }

    /// The output fields of an object or interface type. Empty for every other kind of type.
    pub fn fields(&self) -> &[FieldDefinition] {
        match self {
            TypeDefinition::Object(ty) => &ty.fields,
            TypeDefinition::Interface(ty) => &ty.fields,
            _ => &[],
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields().iter().find(|field| &*field.name == name)
    }

    /// Object, interface and union types: the types a selection set can be made on.
    pub fn is_composite(&self) -> bool {
        matches!(
            self,
            TypeDefinition::Object(_) | TypeDefinition::Interface(_) | TypeDefinition::Union(_)
        )
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, TypeDefinition::Scalar(_) | TypeDefinition::Enum(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScalarTypeDefinition {
    pub description: Option<Arc<str>>,
    pub name: Name,
    pub directives: Arc<[Directive]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectTypeDefinition {
    pub description: Option<Arc<str>>,
    pub name: Name,
    pub interfaces: Arc<[NamedType]>,
    pub directives: Arc<[Directive]>,
    pub fields: Arc<[FieldDefinition]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceTypeDefinition {
    pub description: Option<Arc<str>>,
    pub name: Name,
    pub interfaces: Arc<[NamedType]>,
    pub directives: Arc<[Directive]>,
    pub fields: Arc<[FieldDefinition]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnionTypeDefinition {
    pub description: Option<Arc<str>>,
    pub name: Name,
    pub directives: Arc<[Directive]>,
    pub members: Arc<[NamedType]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumTypeDefinition {
    pub description: Option<Arc<str>>,
    pub name: Name,
    pub directives: Arc<[Directive]>,
    pub values: Arc<[EnumValueDefinition]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumValueDefinition {
    pub description: Option<Arc<str>>,
    pub name: Name,
    pub directives: Arc<[Directive]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputObjectTypeDefinition {
    pub description: Option<Arc<str>>,
    pub name: Name,
    pub directives: Arc<[Directive]>,
    pub fields: Arc<[InputValueDefinition]>,
}

/// An argument definition, or a field of an input object.
#[derive(Debug, Clone, PartialEq)]
pub struct InputValueDefinition {
    pub description: Option<Arc<str>>,
    pub name: Name,
    pub ty: Type,
    pub default_value: Option<Value>,
    pub directives: Arc<[Directive]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    pub description: Option<Arc<str>>,
    pub name: Name,
    pub arguments: Arc<[InputValueDefinition]>,
    pub ty: Type,
    pub directives: Arc<[Directive]>,
}

/// `extend schema ...` or `extend type ...`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeExtension {
    pub extended: Arc<ExtendedDefinition>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExtendedDefinition {
    Schema(SchemaDefinition),
    Type(TypeDefinition),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectiveDefinition {
    pub description: Option<Arc<str>>,
    pub name: Name,
    pub arguments: Arc<[InputValueDefinition]>,
    pub is_repeatable: bool,
    pub locations: Arc<[Name]>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamedType {
    pub name: Name,
}

impl NamedType {
    pub fn new(name: &str) -> Self {
        NamedType { name: name.into() }
    }
}

/// A type reference, with its list and non-null wrappers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Named(NamedType),
    List(Arc<Type>),
    NonNull(Arc<Type>),
}

impl Type {
    /// The named type at the core of the reference, without list and non-null wrappers.
    pub fn named_type(&self) -> &NamedType {
        match self {
            Type::Named(named) => named,
            Type::List(inner) | Type::NonNull(inner) => inner.named_type(),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Named(named) => f.write_str(&named.name),
            Type::List(inner) => write!(f, "[{inner}]"),
            Type::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Directive {
    pub name: Name,
    pub arguments: Arc<[Argument]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub name: Name,
    pub value: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationType {
    Query,
    Mutation,
    Subscription,
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OperationType::Query => "query",
            OperationType::Mutation => "mutation",
            OperationType::Subscription => "subscription",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OperationDefinition {
    pub ty: OperationType,
    pub name: Option<Name>,
    pub variable_definitions: Arc<[VariableDefinition]>,
    pub directives: Arc<[Directive]>,
    pub selection_set: SelectionSet,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDefinition {
    pub variable: Variable,
    pub ty: Type,
    pub default_value: Option<Value>,
    pub directives: Arc<[Directive]>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub name: Name,
}

/// The selections directly under one pair of braces: a selection scope.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionSet {
    pub selections: Arc<[Selection]>,
}

impl Default for SelectionSet {
    fn default() -> Self {
        SelectionSet {
            selections: Vec::new().into(),
        }
    }
}

impl SelectionSet {
    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Field(Field),
    FragmentSpread(FragmentSpread),
    InlineFragment(InlineFragment),
}

impl Selection {
    pub fn as_node(&self) -> NodeRef<'_> {
        match self {
            Selection::Field(field) => NodeRef::Field(field),
            Selection::FragmentSpread(spread) => NodeRef::FragmentSpread(spread),
            Selection::InlineFragment(fragment) => NodeRef::InlineFragment(fragment),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub alias: Option<Name>,
    pub name: Name,
    pub arguments: Arc<[Argument]>,
    pub directives: Arc<[Directive]>,
    pub selection_set: SelectionSet,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FragmentSpread {
    pub name: Name,
    pub directives: Arc<[Directive]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InlineFragment {
    pub type_condition: Option<NamedType>,
    pub directives: Arc<[Directive]>,
    pub selection_set: SelectionSet,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FragmentDefinition {
    pub name: Name,
    pub type_condition: NamedType,
    pub directives: Arc<[Directive]>,
    pub selection_set: SelectionSet,
}

/// An input value. Numbers keep their source text.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Variable(Variable),
    Int(Arc<str>),
    Float(Arc<str>),
    String(Arc<str>),
    Boolean(bool),
    Null,
    Enum(Name),
    List(Arc<[Value]>),
    Object(Arc<[ObjectField]>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectField {
    pub name: Name,
    pub value: Value,
}

/// Every kind of node a [Document] can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeKind {
    Document,
    SchemaDefinition,
    ScalarTypeDefinition,
    ObjectTypeDefinition,
    InterfaceTypeDefinition,
    UnionTypeDefinition,
    EnumTypeDefinition,
    EnumValueDefinition,
    InputObjectTypeDefinition,
    InputValueDefinition,
    FieldDefinition,
    TypeExtension,
    DirectiveDefinition,
    NamedType,
    ListType,
    NonNullType,
    Directive,
    Argument,
    OperationDefinition,
    VariableDefinition,
    Variable,
    SelectionSet,
    Field,
    FragmentSpread,
    InlineFragment,
    FragmentDefinition,
    IntValue,
    FloatValue,
    StringValue,
    BooleanValue,
    NullValue,
    EnumValue,
    ListValue,
    ObjectValue,
    ObjectField,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Document => "Document",
            NodeKind::SchemaDefinition => "SchemaDefinition",
            NodeKind::ScalarTypeDefinition => "ScalarTypeDefinition",
            NodeKind::ObjectTypeDefinition => "ObjectTypeDefinition",
            NodeKind::InterfaceTypeDefinition => "InterfaceTypeDefinition",
            NodeKind::UnionTypeDefinition => "UnionTypeDefinition",
            NodeKind::EnumTypeDefinition => "EnumTypeDefinition",
            NodeKind::EnumValueDefinition => "EnumValueDefinition",
            NodeKind::InputObjectTypeDefinition => "InputObjectTypeDefinition",
            NodeKind::InputValueDefinition => "InputValueDefinition",
            NodeKind::FieldDefinition => "FieldDefinition",
            NodeKind::TypeExtension => "TypeExtension",
            NodeKind::DirectiveDefinition => "DirectiveDefinition",
            NodeKind::NamedType => "NamedType",
            NodeKind::ListType => "ListType",
            NodeKind::NonNullType => "NonNullType",
            NodeKind::Directive => "Directive",
            NodeKind::Argument => "Argument",
            NodeKind::OperationDefinition => "OperationDefinition",
            NodeKind::VariableDefinition => "VariableDefinition",
            NodeKind::Variable => "Variable",
            NodeKind::SelectionSet => "SelectionSet",
            NodeKind::Field => "Field",
            NodeKind::FragmentSpread => "FragmentSpread",
            NodeKind::InlineFragment => "InlineFragment",
            NodeKind::FragmentDefinition => "FragmentDefinition",
            NodeKind::IntValue => "IntValue",
            NodeKind::FloatValue => "FloatValue",
            NodeKind::StringValue => "StringValue",
            NodeKind::BooleanValue => "BooleanValue",
            NodeKind::NullValue => "NullValue",
            NodeKind::EnumValue => "EnumValue",
            NodeKind::ListValue => "ListValue",
            NodeKind::ObjectValue => "ObjectValue",
            NodeKind::ObjectField => "ObjectField",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A borrowed reference to any node of a [Document].
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Document(&'a Document),
    SchemaDefinition(&'a SchemaDefinition),
    ScalarTypeDefinition(&'a ScalarTypeDefinition),
    ObjectTypeDefinition(&'a ObjectTypeDefinition),
    InterfaceTypeDefinition(&'a InterfaceTypeDefinition),
    UnionTypeDefinition(&'a UnionTypeDefinition),
    EnumTypeDefinition(&'a EnumTypeDefinition),
    EnumValueDefinition(&'a EnumValueDefinition),
    InputObjectTypeDefinition(&'a InputObjectTypeDefinition),
    InputValueDefinition(&'a InputValueDefinition),
    FieldDefinition(&'a FieldDefinition),
    TypeExtension(&'a TypeExtension),
    DirectiveDefinition(&'a DirectiveDefinition),
    NamedType(&'a NamedType),
    /// Always a [Type::List].
    ListType(&'a Type),
    /// Always a [Type::NonNull].
    NonNullType(&'a Type),
    Directive(&'a Directive),
    Argument(&'a Argument),
    OperationDefinition(&'a OperationDefinition),
    VariableDefinition(&'a VariableDefinition),
    Variable(&'a Variable),
    SelectionSet(&'a SelectionSet),
    Field(&'a Field),
    FragmentSpread(&'a FragmentSpread),
    InlineFragment(&'a InlineFragment),
    FragmentDefinition(&'a FragmentDefinition),
    /// Any value other than a variable.
    Value(&'a Value),
    ObjectField(&'a ObjectField),
}

impl<'a> NodeRef<'a> {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeRef::Document(_) => NodeKind::Document,
            NodeRef::SchemaDefinition(_) => NodeKind::SchemaDefinition,
            NodeRef::ScalarTypeDefinition(_) => NodeKind::ScalarTypeDefinition,
            NodeRef::ObjectTypeDefinition(_) => NodeKind::ObjectTypeDefinition,
            NodeRef::InterfaceTypeDefinition(_) => NodeKind::InterfaceTypeDefinition,
            NodeRef::UnionTypeDefinition(_) => NodeKind::UnionTypeDefinition,
            NodeRef::EnumTypeDefinition(_) => NodeKind::EnumTypeDefinition,
            NodeRef::EnumValueDefinition(_) => NodeKind::EnumValueDefinition,
            NodeRef::InputObjectTypeDefinition(_) => NodeKind::InputObjectTypeDefinition,
            NodeRef::InputValueDefinition(_) => NodeKind::InputValueDefinition,
            NodeRef::FieldDefinition(_) => NodeKind::FieldDefinition,
            NodeRef::TypeExtension(_) => NodeKind::TypeExtension,
            NodeRef::DirectiveDefinition(_) => NodeKind::DirectiveDefinition,
            NodeRef::NamedType(_) => NodeKind::NamedType,
            NodeRef::ListType(_) => NodeKind::ListType,
            NodeRef::NonNullType(_) => NodeKind::NonNullType,
            NodeRef::Directive(_) => NodeKind::Directive,
            NodeRef::Argument(_) => NodeKind::Argument,
            NodeRef::OperationDefinition(_) => NodeKind::OperationDefinition,
            NodeRef::VariableDefinition(_) => NodeKind::VariableDefinition,
            NodeRef::Variable(_) => NodeKind::Variable,
            NodeRef::SelectionSet(_) => NodeKind::SelectionSet,
            NodeRef::Field(_) => NodeKind::Field,
            NodeRef::FragmentSpread(_) => NodeKind::FragmentSpread,
            NodeRef::InlineFragment(_) => NodeKind::InlineFragment,
            NodeRef::FragmentDefinition(_) => NodeKind::FragmentDefinition,
            NodeRef::Value(value) => match value {
                Value::Variable(_) => NodeKind::Variable,
                Value::Int(_) => NodeKind::IntValue,
                Value::Float(_) => NodeKind::FloatValue,
                Value::String(_) => NodeKind::StringValue,
                Value::Boolean(_) => NodeKind::BooleanValue,
                Value::Null => NodeKind::NullValue,
                Value::Enum(_) => NodeKind::EnumValue,
                Value::List(_) => NodeKind::ListValue,
                Value::Object(_) => NodeKind::ObjectValue,
            },
            NodeRef::ObjectField(_) => NodeKind::ObjectField,
        }
    }

    /// The name of the node, for the kinds of nodes that have one.
    pub fn name(&self) -> Option<&'a str> {
        match *self {
            NodeRef::ScalarTypeDefinition(node) => Some(&node.name),
            NodeRef::ObjectTypeDefinition(node) => Some(&node.name),
            NodeRef::InterfaceTypeDefinition(node) => Some(&node.name),
            NodeRef::UnionTypeDefinition(node) => Some(&node.name),
            NodeRef::EnumTypeDefinition(node) => Some(&node.name),
            NodeRef::EnumValueDefinition(node) => Some(&node.name),
            NodeRef::InputObjectTypeDefinition(node) => Some(&node.name),
            NodeRef::InputValueDefinition(node) => Some(&node.name),
            NodeRef::FieldDefinition(node) => Some(&node.name),
            NodeRef::DirectiveDefinition(node) => Some(&node.name),
            NodeRef::NamedType(node) => Some(&node.name),
            NodeRef::Directive(node) => Some(&node.name),
            NodeRef::Argument(node) => Some(&node.name),
            NodeRef::OperationDefinition(node) => node.name.as_deref(),
            NodeRef::Variable(node) => Some(&node.name),
            NodeRef::Field(node) => Some(&node.name),
            NodeRef::FragmentSpread(node) => Some(&node.name),
            NodeRef::FragmentDefinition(node) => Some(&node.name),
            NodeRef::ObjectField(node) => Some(&node.name),
            NodeRef::Value(Value::Variable(variable)) => Some(&variable.name),
            NodeRef::Document(_)
            | NodeRef::SchemaDefinition(_)
            | NodeRef::TypeExtension(_)
            | NodeRef::ListType(_)
            | NodeRef::NonNullType(_)
            | NodeRef::VariableDefinition(_)
            | NodeRef::SelectionSet(_)
            | NodeRef::InlineFragment(_)
            | NodeRef::Value(_) => None,
        }
    }
}
