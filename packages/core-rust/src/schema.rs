//! Structural schema reflection for request and response types.
//!
//! Types describe themselves through [`Reflect`]; nothing here ever looks at a
//! value. Records are usually wired up with the [`reflect!`](crate::reflect)
//! macro, which also checks at compile time that every listed field exists
//! with the stated type.
//!
//! The engine is total: primitives map to their schema kind, sequences become
//! arrays, single-level wrappers (`Option`, `Box`, `Arc`, `Rc`) are
//! transparent, and anything without a structural mapping, including a record
//! that refers back to itself, becomes a bare `object` placeholder.

use std::any::TypeId;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Structural description of a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaNode {
    /// Record with serialized field names mapped to their schemas.
    Object(BTreeMap<String, SchemaNode>),
    /// Sequence of the wrapped element schema.
    Array(Box<SchemaNode>),
    String,
    Integer,
    Number,
    Boolean,
    /// Placeholder for kinds with no structural mapping.
    Any,
}

impl SchemaNode {
    /// Value of the `type` keyword this node serializes with.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Object(_) | Self::Any => "object",
            Self::Array(_) => "array",
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }

    #[must_use]
    pub fn properties(&self) -> Option<&BTreeMap<String, SchemaNode>> {
        match self {
            Self::Object(properties) => Some(properties),
            _ => None,
        }
    }

    #[must_use]
    pub fn items(&self) -> Option<&SchemaNode> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }
}

impl Serialize for SchemaNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", self.type_name())?;
        match self {
            Self::Object(properties) => map.serialize_entry("properties", properties)?,
            Self::Array(items) => map.serialize_entry("items", items)?,
            _ => {}
        }
        map.end()
    }
}

/// Types that can describe their own structure.
pub trait Reflect: 'static {
    fn schema() -> SchemaNode;
}

/// One field of a record, as listed in a [`Reflect`] implementation.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    /// Declared field name.
    pub name: &'static str,
    /// Optional serialized-name tag, possibly with `,`-separated qualifiers.
    pub tag: Option<&'static str>,
    pub schema: fn() -> SchemaNode,
}

impl Field {
    /// Key the field is serialized under, or `None` if the tag omits it.
    ///
    /// Qualifiers after the first `,` are dropped, an empty name falls back
    /// to the declared name and `-` skips the field.
    #[must_use]
    pub fn serialized_name(&self) -> Option<&'static str> {
        let Some(tag) = self.tag else {
            return Some(self.name);
        };
        match tag.split(',').next().unwrap_or_default() {
            "-" => None,
            "" => Some(self.name),
            key => Some(key),
        }
    }
}

thread_local! {
    static IN_PROGRESS: RefCell<Vec<TypeId>> = const { RefCell::new(Vec::new()) };
}

/// Pops the record off the in-progress stack even if a field schema panics.
struct VisitGuard;

impl VisitGuard {
    fn enter(id: TypeId) -> Option<Self> {
        IN_PROGRESS.with(|stack| {
            let mut stack = stack.borrow_mut();
            if stack.contains(&id) {
                None
            } else {
                stack.push(id);
                Some(Self)
            }
        })
    }
}

impl Drop for VisitGuard {
    fn drop(&mut self) {
        IN_PROGRESS.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

/// Builds the object schema of record `T` from its field list.
///
/// Re-entering `T` while it is being described yields [`SchemaNode::Any`].
#[must_use]
pub fn object_schema<T: ?Sized + 'static>(fields: &[Field]) -> SchemaNode {
    let Some(_guard) = VisitGuard::enter(TypeId::of::<T>()) else {
        tracing::debug!(
            record = std::any::type_name::<T>(),
            "record refers to itself, emitting placeholder"
        );
        return SchemaNode::Any;
    };

    let properties = fields
        .iter()
        .filter_map(|field| {
            field
                .serialized_name()
                .map(|key| (key.to_string(), (field.schema)()))
        })
        .collect();
    SchemaNode::Object(properties)
}

/// Resolution of a field type to its schema function.
///
/// [`reflect!`](crate::reflect) calls `(&&FieldType::<T>::new()).schema_fn()`.
/// Method lookup picks the [`Reflect`] impl when `T` has one and otherwise
/// falls through to the placeholder, so every field type is accepted,
/// including foreign types that cannot implement [`Reflect`] here.
#[doc(hidden)]
pub mod resolve {
    use std::marker::PhantomData;

    use super::{Reflect, SchemaNode};

    pub struct FieldType<T: ?Sized>(PhantomData<fn() -> Box<T>>);

    impl<T: ?Sized> FieldType<T> {
        #[must_use]
        pub const fn new() -> Self {
            Self(PhantomData)
        }
    }

    pub trait ViaReflect {
        fn schema_fn(&self) -> fn() -> SchemaNode;
    }

    impl<T: Reflect + ?Sized> ViaReflect for &FieldType<T> {
        fn schema_fn(&self) -> fn() -> SchemaNode {
            T::schema
        }
    }

    pub trait ViaPlaceholder {
        fn schema_fn(&self) -> fn() -> SchemaNode;
    }

    impl<T: ?Sized> ViaPlaceholder for FieldType<T> {
        fn schema_fn(&self) -> fn() -> SchemaNode {
            placeholder
        }
    }

    fn placeholder() -> SchemaNode {
        SchemaNode::Any
    }
}

/// Implements [`Reflect`] for a record type.
///
/// Each entry is `field: Type`, optionally followed by `=> "tag"`. A field
/// whose type has no [`Reflect`] impl is described as the `object`
/// placeholder:
///
/// ```
/// use strata_core::{reflect, Reflect, SchemaNode};
///
/// struct CreateUser {
///     email: String,
///     display_name: Option<String>,
///     roles: Vec<String>,
///     origin: std::net::IpAddr,
/// }
///
/// reflect!(CreateUser {
///     email: String,
///     display_name: Option<String> => "displayName,omitempty",
///     roles: Vec<String>,
///     origin: std::net::IpAddr,
/// });
///
/// let schema = CreateUser::schema();
/// let properties = schema.properties().unwrap();
/// assert_eq!(properties["displayName"], SchemaNode::String);
/// assert_eq!(properties["roles"], SchemaNode::Array(Box::new(SchemaNode::String)));
/// assert_eq!(properties["origin"], SchemaNode::Any);
/// ```
///
/// Generic records list their type parameters after `impl`; each parameter
/// gets a [`Reflect`] bound:
///
/// ```
/// use strata_core::{reflect, Reflect, SchemaNode};
///
/// struct Page<T> {
///     items: Vec<T>,
///     total: u64,
/// }
///
/// reflect!(impl<T> Page<T> {
///     items: Vec<T>,
///     total: u64,
/// });
///
/// let schema = Page::<bool>::schema();
/// assert_eq!(
///     schema.properties().unwrap()["items"],
///     SchemaNode::Array(Box::new(SchemaNode::Boolean))
/// );
/// ```
#[macro_export]
macro_rules! reflect {
    (@tag) => {
        ::core::option::Option::None
    };
    (@tag $tag:literal) => {
        ::core::option::Option::Some($tag)
    };
    (@schema $ty:ty { $( $field:ident : $fty:ty $( => $tag:literal )? ),* }) => {{
        #[allow(unused_imports)]
        use $crate::schema::resolve::{ViaPlaceholder as _, ViaReflect as _};

        let _fields_exist = |__value: &$ty| {
            $( let _: &$fty = &__value.$field; )*
        };
        $crate::schema::object_schema::<$ty>(&[
            $(
                $crate::schema::Field {
                    name: ::core::stringify!($field),
                    tag: $crate::reflect!(@tag $($tag)?),
                    schema: (&&$crate::schema::resolve::FieldType::<$fty>::new()).schema_fn(),
                },
            )*
        ])
    }};
    (impl<$( $gen:ident ),+ $(,)?> $ty:ty { $( $field:ident : $fty:ty $( => $tag:literal )? ),* $(,)? }) => {
        impl<$( $gen: $crate::schema::Reflect ),+> $crate::schema::Reflect for $ty {
            fn schema() -> $crate::schema::SchemaNode {
                $crate::reflect!(@schema $ty { $( $field : $fty $( => $tag )? ),* })
            }
        }
    };
    ($ty:ty { $( $field:ident : $fty:ty $( => $tag:literal )? ),* $(,)? }) => {
        impl $crate::schema::Reflect for $ty {
            fn schema() -> $crate::schema::SchemaNode {
                $crate::reflect!(@schema $ty { $( $field : $fty $( => $tag )? ),* })
            }
        }
    };
}

macro_rules! reflect_as {
    ($node:expr => $($ty:ty),+ $(,)?) => {
        $(
            impl Reflect for $ty {
                fn schema() -> SchemaNode {
                    $node
                }
            }
        )+
    };
}

reflect_as!(SchemaNode::String => String, str, char);
reflect_as!(SchemaNode::Integer => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
reflect_as!(SchemaNode::Number => f32, f64);
reflect_as!(SchemaNode::Boolean => bool);
reflect_as!(SchemaNode::Any => (), serde_json::Value, SystemTime, Duration);

impl<T: Reflect> Reflect for Vec<T> {
    fn schema() -> SchemaNode {
        SchemaNode::Array(Box::new(T::schema()))
    }
}

impl<T: Reflect> Reflect for VecDeque<T> {
    fn schema() -> SchemaNode {
        SchemaNode::Array(Box::new(T::schema()))
    }
}

impl<T: Reflect> Reflect for [T] {
    fn schema() -> SchemaNode {
        SchemaNode::Array(Box::new(T::schema()))
    }
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn schema() -> SchemaNode {
        SchemaNode::Array(Box::new(T::schema()))
    }
}

impl<T: Reflect, S: 'static> Reflect for HashSet<T, S> {
    fn schema() -> SchemaNode {
        SchemaNode::Array(Box::new(T::schema()))
    }
}

impl<T: Reflect> Reflect for BTreeSet<T> {
    fn schema() -> SchemaNode {
        SchemaNode::Array(Box::new(T::schema()))
    }
}

impl<T: Reflect> Reflect for Option<T> {
    fn schema() -> SchemaNode {
        T::schema()
    }
}

impl<T: Reflect + ?Sized> Reflect for Box<T> {
    fn schema() -> SchemaNode {
        T::schema()
    }
}

impl<T: Reflect + ?Sized> Reflect for Arc<T> {
    fn schema() -> SchemaNode {
        T::schema()
    }
}

impl<T: Reflect + ?Sized> Reflect for Rc<T> {
    fn schema() -> SchemaNode {
        T::schema()
    }
}

impl<K: 'static, V: 'static, S: 'static> Reflect for HashMap<K, V, S> {
    fn schema() -> SchemaNode {
        SchemaNode::Any
    }
}

impl<K: 'static, V: 'static> Reflect for BTreeMap<K, V> {
    fn schema() -> SchemaNode {
        SchemaNode::Any
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::reflect;

    struct Address {
        street: String,
        zip: u32,
    }

    reflect!(Address {
        street: String,
        zip: u32 => "postal_code",
    });

    struct Profile {
        email: String,
        age: Option<u8>,
        score: f64,
        active: bool,
        addresses: Vec<Address>,
        primary: Box<Address>,
        attributes: HashMap<String, String>,
        secret: String,
        nickname: String,
    }

    reflect!(Profile {
        email: String => "email,omitempty",
        age: Option<u8>,
        score: f64,
        active: bool,
        addresses: Vec<Address>,
        primary: Box<Address>,
        attributes: HashMap<String, String>,
        secret: String => "-",
        nickname: String => ",omitempty",
    });

    struct TreeNode {
        label: String,
        children: Vec<TreeNode>,
        parent: Option<Box<TreeNode>>,
    }

    reflect!(TreeNode {
        label: String,
        children: Vec<TreeNode>,
        parent: Option<Box<TreeNode>>,
    });

    struct Empty;

    reflect!(Empty {});

    struct Connection {
        peer: std::net::SocketAddr,
        opened: std::time::Instant,
        hops: Vec<std::net::IpAddr>,
        name: String,
    }

    reflect!(Connection {
        peer: std::net::SocketAddr,
        opened: std::time::Instant => "opened_at",
        hops: Vec<std::net::IpAddr>,
        name: String,
    });

    struct Page<T> {
        items: Vec<T>,
        next: Option<String>,
    }

    reflect!(impl<T> Page<T> {
        items: Vec<T>,
        next: Option<String>,
    });

    struct Pair<A, B> {
        left: A,
        right: B,
    }

    reflect!(impl<A, B,> Pair<A, B> { left: A, right: B });

    fn address_node() -> SchemaNode {
        SchemaNode::Object(BTreeMap::from([
            ("street".to_string(), SchemaNode::String),
            ("postal_code".to_string(), SchemaNode::Integer),
        ]))
    }

    #[test]
    fn primitives_map_to_their_kinds() {
        assert_eq!(String::schema(), SchemaNode::String);
        assert_eq!(<str>::schema(), SchemaNode::String);
        assert_eq!(i64::schema(), SchemaNode::Integer);
        assert_eq!(u16::schema(), SchemaNode::Integer);
        assert_eq!(f32::schema(), SchemaNode::Number);
        assert_eq!(bool::schema(), SchemaNode::Boolean);
        assert_eq!(<()>::schema(), SchemaNode::Any);
    }

    #[test]
    fn wrappers_are_transparent() {
        assert_eq!(Option::<String>::schema(), SchemaNode::String);
        assert_eq!(Box::<i32>::schema(), SchemaNode::Integer);
        assert_eq!(Arc::<str>::schema(), SchemaNode::String);
        assert_eq!(
            Option::<Vec<bool>>::schema(),
            SchemaNode::Array(Box::new(SchemaNode::Boolean))
        );
    }

    #[test]
    fn nested_records_are_described() {
        let schema = Profile::schema();
        let properties = schema.properties().unwrap();

        assert_eq!(properties["email"], SchemaNode::String);
        assert_eq!(properties["age"], SchemaNode::Integer);
        assert_eq!(properties["score"], SchemaNode::Number);
        assert_eq!(properties["active"], SchemaNode::Boolean);
        assert_eq!(
            properties["addresses"],
            SchemaNode::Array(Box::new(address_node()))
        );
        assert_eq!(properties["primary"], address_node());
        assert_eq!(properties["attributes"], SchemaNode::Any);
    }

    #[test]
    fn tags_are_truncated_and_respected() {
        let schema = Profile::schema();
        let properties = schema.properties().unwrap();

        assert!(properties.contains_key("email"));
        assert!(!properties.contains_key("email,omitempty"));
        assert!(!properties.contains_key("secret"));
        assert!(!properties.contains_key("-"));
        assert!(properties.contains_key("nickname"));
        assert_eq!(properties.len(), 8);
    }

    #[test]
    fn self_referencing_record_terminates() {
        let schema = TreeNode::schema();
        let properties = schema.properties().unwrap();
        assert_eq!(properties["label"], SchemaNode::String);
        assert_eq!(
            properties["children"],
            SchemaNode::Array(Box::new(SchemaNode::Any))
        );
        assert_eq!(properties["parent"], SchemaNode::Any);

        // The guard is released once the outer description is finished.
        assert!(TreeNode::schema().properties().is_some());
    }

    #[test]
    fn empty_record_has_empty_properties() {
        assert_eq!(Empty::schema(), SchemaNode::Object(BTreeMap::new()));
    }

    #[test]
    fn serializes_as_json_schema_fragment() {
        let value = serde_json::to_value(Address::schema()).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "object",
                "properties": {
                    "postal_code": { "type": "integer" },
                    "street": { "type": "string" }
                }
            })
        );

        let value = serde_json::to_value(Vec::<HashMap<u8, u8>>::schema()).unwrap();
        assert_eq!(
            value,
            json!({ "type": "array", "items": { "type": "object" } })
        );
    }

    #[test]
    fn fields_without_reflect_become_placeholders() {
        let value = serde_json::to_value(Connection::schema()).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "object",
                "properties": {
                    "hops": { "type": "object" },
                    "name": { "type": "string" },
                    "opened_at": { "type": "object" },
                    "peer": { "type": "object" }
                }
            })
        );
    }

    #[test]
    fn generic_records_follow_their_parameters() {
        let page = Page::<Address>::schema();
        let properties = page.properties().unwrap();
        assert_eq!(
            properties["items"],
            SchemaNode::Array(Box::new(address_node()))
        );
        assert_eq!(properties["next"], SchemaNode::String);

        assert_eq!(
            Page::<u32>::schema().properties().unwrap()["items"],
            SchemaNode::Array(Box::new(SchemaNode::Integer))
        );
    }

    #[test]
    fn nested_generic_instantiations_are_not_mistaken_for_recursion() {
        let pair = Pair::<Pair<bool, f64>, String>::schema();
        let left = pair.properties().unwrap()["left"].clone();
        assert_eq!(
            left,
            SchemaNode::Object(BTreeMap::from([
                ("left".to_string(), SchemaNode::Boolean),
                ("right".to_string(), SchemaNode::Number),
            ]))
        );
        assert_eq!(pair.properties().unwrap()["right"], SchemaNode::String);
    }

    #[test]
    fn field_serialized_name_rules() {
        let plain = Field {
            name: "name",
            tag: None,
            schema: String::schema,
        };
        assert_eq!(plain.serialized_name(), Some("name"));

        let tagged = Field {
            tag: Some("full_name,omitempty,string"),
            ..plain
        };
        assert_eq!(tagged.serialized_name(), Some("full_name"));

        let empty = Field {
            tag: Some(""),
            ..plain
        };
        assert_eq!(empty.serialized_name(), Some("name"));

        let skipped = Field {
            tag: Some("-"),
            ..plain
        };
        assert_eq!(skipped.serialized_name(), None);
    }
}
