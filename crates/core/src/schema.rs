//! Model schemas
//!
//! Conventions decide whether they own a method by comparing the method's
//! parameter types with the member types of the model the contract targets.
//! Rust has no runtime reflection over struct members, so every model states
//! its members explicitly through [`Model::schema`].
//!
//! ```ignore
//! impl Model for Company {
//!     fn schema() -> ModelSchema {
//!         ModelSchema::new("Company")
//!             .field("id", FieldType::Int)
//!             .field("name", FieldType::String)
//!             .field("child_companies", FieldType::array(FieldType::Int))
//!     }
//! }
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Static type of a model member or a method parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    /// Boolean
    Bool,
    /// Signed or unsigned integer
    Int,
    /// Floating point number
    Float,
    /// UTF-8 string
    String,
    /// Nested document
    Document,
    /// Homogeneous array
    Array(Box<FieldType>),
    /// Untyped JSON value
    Any,
}

impl FieldType {
    /// Array of the given element type
    pub fn array(element: FieldType) -> Self {
        FieldType::Array(Box::new(element))
    }

    /// Element type if this is an array
    pub fn element(&self) -> Option<&FieldType> {
        match self {
            FieldType::Array(inner) => Some(inner),
            _ => None,
        }
    }

    /// Whether this is an array type
    pub fn is_array(&self) -> bool {
        matches!(self, FieldType::Array(_))
    }

    /// Whether a JSON value conforms to this type
    ///
    /// `null` only conforms to `Any`.
    pub fn accepts(&self, value: &serde_json::Value) -> bool {
        use serde_json::Value;
        match (self, value) {
            (FieldType::Any, _) => true,
            (FieldType::Bool, Value::Bool(_)) => true,
            (FieldType::Int, Value::Number(n)) => n.is_i64() || n.is_u64(),
            (FieldType::Float, Value::Number(_)) => true,
            (FieldType::String, Value::String(_)) => true,
            (FieldType::Document, Value::Object(_)) => true,
            (FieldType::Array(inner), Value::Array(items)) => items.iter().all(|i| inner.accepts(i)),
            _ => false,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Bool => write!(f, "bool"),
            FieldType::Int => write!(f, "int"),
            FieldType::Float => write!(f, "float"),
            FieldType::String => write!(f, "string"),
            FieldType::Document => write!(f, "document"),
            FieldType::Array(inner) => write!(f, "[{}]", inner),
            FieldType::Any => write!(f, "any"),
        }
    }
}

/// A named member of a model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field name as stored in documents
    pub name: String,
    /// Field type
    pub ty: FieldType,
}

/// Ordered member list of a model type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSchema {
    /// Model name, used in diagnostics
    pub name: String,
    /// Members in declaration order
    pub fields: Vec<FieldDef>,
}

impl ModelSchema {
    /// Create an empty schema
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Add a member
    pub fn field(mut self, name: impl Into<String>, ty: FieldType) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            ty,
        });
        self
    }

    /// Look up a member's type by name
    pub fn field_type(&self, name: &str) -> Option<&FieldType> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.ty)
    }

    /// Whether a member with this name exists
    pub fn has_field(&self, name: &str) -> bool {
        self.field_type(name).is_some()
    }
}

/// A type stored in a collection and queried through a contract
pub trait Model: Serialize + DeserializeOwned + Send + 'static {
    /// Member names and types of this model
    fn schema() -> ModelSchema;
}

/// Maps a Rust parameter type onto a [`FieldType`]
///
/// Used by contract declarations to describe parameter types without
/// reflection.
pub trait FieldKind {
    /// The field type this Rust type corresponds to
    fn field_type() -> FieldType;
}

macro_rules! field_kind {
    ($ty:expr => $($t:ty),+) => {
        $(
            impl FieldKind for $t {
                fn field_type() -> FieldType {
                    $ty
                }
            }
        )+
    };
}

field_kind!(FieldType::Int => i8, i16, i32, i64, u8, u16, u32, u64, isize, usize);
field_kind!(FieldType::Float => f32, f64);
field_kind!(FieldType::String => String, &str);
field_kind!(FieldType::Bool => bool);
field_kind!(FieldType::Any => serde_json::Value);
field_kind!(FieldType::Document => serde_json::Map<String, serde_json::Value>);

impl<T: FieldKind> FieldKind for Vec<T> {
    fn field_type() -> FieldType {
        FieldType::array(T::field_type())
    }
}

impl<T: FieldKind> FieldKind for &[T] {
    fn field_type() -> FieldType {
        FieldType::array(T::field_type())
    }
}
