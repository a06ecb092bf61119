//! Data model for library metadata and parsed doc comments.
//!
//! Descriptors are deserialized straight from the metadata manifest and are
//! immutable for the duration of a run.

use serde::Deserialize;
use std::cmp::Ordering;

/// Visibility tier, ordered `Private < Internal < Protected < Public`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accessibility {
    Private,
    Internal,
    Protected,
    Public,
}

impl Accessibility {
    /// Keyword used in rendered declarations.
    pub fn keyword(self) -> &'static str {
        match self {
            Accessibility::Private => "private",
            Accessibility::Internal => "internal",
            Accessibility::Protected => "protected",
            Accessibility::Public => "public",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Class,
    Interface,
    Struct,
    Enum,
    Delegate,
}

impl TypeKind {
    pub fn keyword(self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Interface => "interface",
            TypeKind::Struct => "struct",
            TypeKind::Enum => "enum",
            TypeKind::Delegate => "delegate",
        }
    }
}

/// Member kinds in the order their groups appear on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    Constructor,
    Property,
    Method,
    Operator,
    Event,
    Field,
}

impl MemberKind {
    pub const DISPLAY_ORDER: [MemberKind; 6] = [
        MemberKind::Constructor,
        MemberKind::Property,
        MemberKind::Method,
        MemberKind::Operator,
        MemberKind::Event,
        MemberKind::Field,
    ];

    /// Heading of the group on a type page.
    pub fn group_title(self) -> &'static str {
        match self {
            MemberKind::Constructor => "Constructors",
            MemberKind::Property => "Properties",
            MemberKind::Method => "Methods",
            MemberKind::Operator => "Operators",
            MemberKind::Event => "Events",
            MemberKind::Field => "Fields",
        }
    }
}

/// A reference to a type from a signature, base list or doc comment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TypeReference {
    /// A named type; `name` carries the arity marker for generic definitions.
    #[serde(rename_all = "camelCase")]
    Named {
        #[serde(default)]
        namespace: String,
        name: String,
        #[serde(default)]
        generic_arguments: Vec<TypeReference>,
    },
    #[serde(rename_all = "camelCase")]
    Array {
        element: Box<TypeReference>,
        #[serde(default = "default_rank")]
        rank: u32,
    },
    #[serde(rename_all = "camelCase")]
    ByRef { element: Box<TypeReference> },
    /// A generic parameter of the declaring type or (if `method`) of the member.
    #[serde(rename_all = "camelCase")]
    GenericParameter {
        name: String,
        position: u32,
        #[serde(default)]
        method: bool,
    },
}

fn default_rank() -> u32 {
    1
}

impl TypeReference {
    /// Shorthand for a non-generic named type.
    pub fn named(namespace: &str, name: &str) -> Self {
        TypeReference::Named {
            namespace: namespace.to_string(),
            name: name.to_string(),
            generic_arguments: Vec::new(),
        }
    }

    /// Fully qualified metadata name of a named type (`Ns.List`1`).
    pub fn full_name(&self) -> Option<String> {
        match self {
            TypeReference::Named {
                namespace, name, ..
            } => Some(qualify(namespace, name)),
            _ => None,
        }
    }
}

/// Join a namespace and a simple name.
pub fn qualify(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", namespace, name)
    }
}

/// Strip the generic arity marker from a metadata name (`Box`1` → `Box`).
pub fn strip_arity(name: &str) -> &str {
    name.split('`').next().unwrap_or(name)
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeReference,
    #[serde(default)]
    pub default_value: Option<String>,
}

/// One documentable member of a type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDescriptor {
    pub kind: MemberKind,
    pub name: String,
    pub accessibility: Accessibility,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Absent for constructors and `void` methods.
    #[serde(default)]
    pub return_type: Option<TypeReference>,
    #[serde(default)]
    pub generic_parameters: Vec<String>,
    #[serde(default)]
    pub getter: bool,
    #[serde(default)]
    pub setter: bool,
    /// Literal value of constants and enum fields.
    #[serde(default)]
    pub value: Option<String>,
}

/// A type declared in the documented library.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDescriptor {
    #[serde(default)]
    pub namespace: String,
    /// Metadata name including any arity marker.
    pub name: String,
    #[serde(default)]
    pub generic_parameters: Vec<String>,
    pub accessibility: Accessibility,
    pub kind: TypeKind,
    #[serde(default)]
    pub base_type: Option<TypeReference>,
    #[serde(default)]
    pub interfaces: Vec<TypeReference>,
    #[serde(default)]
    pub members: Vec<MemberDescriptor>,
}

impl TypeDescriptor {
    /// Identity: namespace-qualified name including arity.
    pub fn full_name(&self) -> String {
        qualify(&self.namespace, &self.name)
    }

    /// Public, non-delegate types get a page.
    pub fn is_documentable(&self) -> bool {
        self.accessibility == Accessibility::Public && self.kind != TypeKind::Delegate
    }

    /// Name shown to readers: `Box<T>` for ``Box`1``.
    pub fn display_name(&self) -> String {
        let simple = strip_arity(&self.name);
        if self.generic_parameters.is_empty() {
            simple.to_string()
        } else {
            format!("{}<{}>", simple, self.generic_parameters.join(", "))
        }
    }

    /// Sort key for the index page: namespace, then metadata name.
    pub fn index_order(&self, other: &TypeDescriptor) -> Ordering {
        self.namespace
            .cmp(&other.namespace)
            .then_with(|| self.name.cmp(&other.name))
    }
}

/// Inline content of a doc comment section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    /// `<c>`, `<see langword>`, `<paramref>`, `<typeparamref>`
    Code(String),
    /// `<code>` block, already unindented.
    CodeBlock(String),
    /// `<see cref>`: a canonical identifier.
    Cref(String),
    Href { url: String, text: String },
    /// `<para>` boundary.
    Break,
}

/// A rich text section of a doc comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocText(pub Vec<Inline>);

impl DocText {
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|inline| match inline {
            Inline::Text(t) => t.trim().is_empty(),
            Inline::Break => true,
            _ => false,
        })
    }

    pub fn plain(text: &str) -> Self {
        DocText(vec![Inline::Text(text.to_string())])
    }
}

/// Parsed doc comment of one member identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocComment {
    pub summary: DocText,
    pub remarks: DocText,
    pub params: Vec<(String, DocText)>,
    pub type_params: Vec<(String, DocText)>,
    pub returns: DocText,
    /// `<value>` of a property.
    pub value: DocText,
    /// `(cref, description)` pairs in declaration order.
    pub exceptions: Vec<(String, DocText)>,
    pub example: DocText,
}

impl DocComment {
    pub fn param(&self, name: &str) -> Option<&DocText> {
        self.params.iter().find(|(n, _)| n == name).map(|(_, t)| t)
    }

    pub fn type_param(&self, name: &str) -> Option<&DocText> {
        self.type_params.iter().find(|(n, _)| n == name).map(|(_, t)| t)
    }
}
