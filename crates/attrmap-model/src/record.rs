//! Records and their object-safe attribute view.

use std::any::TypeId;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::builder::{assign_fields, construct_with_schema};
use crate::error::{ConstructError, RecordError, ValidationError};
use crate::schema::{RecordKind, Schema};

/// Named attribute values, ordered by name.
pub type Fields = BTreeMap<String, Value>;

/// A type the mapper can read attributes from and construct.
///
/// Field values travel through `serde`: the serialized object of a record is
/// its set of instance attributes, and construction deserializes the declared
/// parameters back into the type. Fields that are not constructor parameters
/// need `#[serde(default)]` so the constructor can build the record.
pub trait Record: Serialize + DeserializeOwned + 'static {
    /// Declared constructor parameters and class-level attributes.
    fn schema() -> Schema;

    /// Computed read-only attributes exposed alongside the fields.
    fn properties(&self) -> Fields {
        Fields::new()
    }

    /// Model-level validation, run after construction.
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    /// The constructor.
    ///
    /// `args` is keyed by [`Param::key_for`](crate::Param::key_for). The default
    /// implementation fills declared defaults, reports missing parameters and
    /// validates the result.
    fn construct(args: Fields) -> Result<Self, ConstructError> {
        construct_with_schema(args)
    }

    /// Overwrite the named fields of an existing instance in place.
    ///
    /// The default round-trips the record through serde with
    /// [`assign_fields`](crate::assign_fields), which resets state serde does
    /// not carry. Records holding such state override this to keep it.
    fn assign(&mut self, fields: Fields) -> Result<(), RecordError> {
        assign_fields(self, fields)
    }
}

/// Identity of a record type, compared by [`TypeId`].
#[derive(Debug, Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    pub fn of<T: Record>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: T::schema().type_name(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for TypeKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A record type together with its schema.
#[derive(Debug, Clone)]
pub struct TypeInfo {
    key: TypeKey,
    schema: Schema,
}

impl TypeInfo {
    pub fn of<T: Record>() -> Self {
        let schema = T::schema();
        Self {
            key: TypeKey {
                id: TypeId::of::<T>(),
                name: schema.type_name(),
            },
            schema,
        }
    }

    pub fn key(&self) -> TypeKey {
        self.key
    }

    pub fn name(&self) -> &'static str {
        self.key.name
    }

    pub fn kind(&self) -> RecordKind {
        self.schema.kind()
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}

/// Object-safe view of a record instance.
pub trait AttributeSource {
    fn type_info(&self) -> TypeInfo;

    /// Serialized field values of the instance.
    fn field_values(&self) -> Result<Fields, RecordError>;

    fn computed_properties(&self) -> Fields;
}

impl<T: Record> AttributeSource for T {
    fn type_info(&self) -> TypeInfo {
        TypeInfo::of::<T>()
    }

    fn field_values(&self) -> Result<Fields, RecordError> {
        to_fields(self)
    }

    fn computed_properties(&self) -> Fields {
        self.properties()
    }
}

impl fmt::Debug for dyn AttributeSource + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AttributeSource")
            .field(&self.type_info().name())
            .finish()
    }
}

/// Serialize a value into its named fields.
pub fn to_fields<T: Serialize + ?Sized>(value: &T) -> Result<Fields, RecordError> {
    let type_name = std::any::type_name::<T>();
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map.into_iter().collect()),
        Ok(_) => Err(RecordError::NotAnObject { type_name }),
        Err(source) => Err(RecordError::Serialize { type_name, source }),
    }
}

/// Deserialize named fields into a value.
pub fn from_fields<T: DeserializeOwned>(fields: Fields) -> Result<T, RecordError> {
    let object: serde_json::Map<String, Value> = fields.into_iter().collect();
    serde_json::from_value(Value::Object(object)).map_err(|source| RecordError::Deserialize {
        type_name: std::any::type_name::<T>(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;
    use crate::schema::Param;

    #[derive(Debug, Serialize, Deserialize)]
    struct Point {
        x: i64,
        y: i64,
    }

    impl Record for Point {
        fn schema() -> Schema {
            Schema::plain("Point")
                .param(Param::required("x"))
                .param(Param::required("y"))
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    struct Label(String);

    impl Record for Label {
        fn schema() -> Schema {
            Schema::plain("Label")
        }
    }

    #[test]
    fn fields_round_trip_through_serde() {
        let fields = to_fields(&Point { x: 1, y: 2 }).unwrap();
        assert_eq!(fields.get("x"), Some(&json!(1)));
        assert_eq!(fields.get("y"), Some(&json!(2)));

        let point: Point = from_fields(fields).unwrap();
        assert_eq!(point.x, 1);
    }

    #[test]
    fn non_object_values_are_rejected() {
        let err = to_fields(&Label("x".to_string())).unwrap_err();
        assert!(matches!(err, RecordError::NotAnObject { .. }));
    }

    #[test]
    fn type_keys_compare_by_type() {
        assert_eq!(TypeKey::of::<Point>(), TypeKey::of::<Point>());
        assert_ne!(TypeKey::of::<Point>(), TypeKey::of::<Label>());
        assert_eq!(TypeKey::of::<Point>().to_string(), "Point");
    }

    #[test]
    fn attribute_source_is_object_safe() {
        let point = Point { x: 3, y: 4 };
        let source: &dyn AttributeSource = &point;

        assert_eq!(source.type_info().name(), "Point");
        assert_eq!(source.field_values().unwrap().len(), 2);
        assert!(source.computed_properties().is_empty());
    }
}
