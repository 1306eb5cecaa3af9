//! Typed field paths and filter predicates.
//!
//! This module resolves declared entity shapes into the slash-joined field paths the
//! serializer works with:
//! - `Schema` trait: Maps field enums to wire names
//! - `FieldRef`: Const, type-safe reference to one field of a schema
//! - `FieldPath`: Owned path through nested entities (`address/street`)
//! - `ODataEntity`: Links a record type to its schema so nested fields can be reached
//!
//! Both `FieldRef` and `FieldPath` build raw [`FilterExpr`] predicates
//! (`id gt 5`, `startswith(title, 'test')`) and [`OrderKey`]s.

use crate::filter::FilterExpr;
use crate::query::OrderKey;
use crate::value::Value;
use crate::SortDir;
use bigdecimal::BigDecimal;
use std::marker::PhantomData;

/// Schema trait defining field enums and their wire names.
///
/// # Example
///
/// ```rust
/// use odata_query::Schema;
///
/// #[derive(Copy, Clone, Eq, PartialEq)]
/// enum UserField {
///     Id,
///     Name,
/// }
///
/// struct UserSchema;
///
/// impl Schema for UserSchema {
///     type Field = UserField;
///
///     fn field_name(field: Self::Field) -> &'static str {
///         match field {
///             UserField::Id => "id",
///             UserField::Name => "name",
///         }
///     }
/// }
/// ```
pub trait Schema {
    /// The field enum type (must be Copy + Eq)
    type Field: Copy + Eq;

    /// Map a field enum to its wire name
    fn field_name(field: Self::Field) -> &'static str;
}

/// Record types that have a [`Schema`].
///
/// A `FieldRef<S, T>` whose `T` is an entity can be extended with a field of
/// `T::Schema`, producing a nested [`FieldPath`].
pub trait ODataEntity {
    type Schema: Schema;
}

impl<E: ODataEntity> ODataEntity for Option<E> {
    type Schema = E::Schema;
}

impl<E: ODataEntity> ODataEntity for Vec<E> {
    type Schema = E::Schema;
}

/// Anything that resolves to a field path string.
///
/// Object-safe, so mixed field types can be passed together as
/// `[&a as &dyn AsFieldPath, &b]`.
pub trait AsFieldPath {
    fn as_field_path(&self) -> &str;
}

impl AsFieldPath for str {
    fn as_field_path(&self) -> &str {
        self
    }
}

impl AsFieldPath for String {
    fn as_field_path(&self) -> &str {
        self
    }
}

impl<T: AsFieldPath + ?Sized> AsFieldPath for &T {
    fn as_field_path(&self) -> &str {
        (**self).as_field_path()
    }
}

/// Type-safe reference to a single field of schema `S` holding a `T`.
///
/// **NOTE:** equality is based solely on the schema field; `T` is a phantom marker used
/// to gate which predicates are available.
pub struct FieldRef<S: Schema, T> {
    field: S::Field,
    _phantom: PhantomData<fn() -> (S, T)>,
}

impl<S: Schema, T> FieldRef<S, T> {
    /// Create a new typed field reference.
    ///
    /// ```rust,ignore
    /// const NAME: FieldRef<UserSchema, String> = FieldRef::new(UserField::Name);
    /// ```
    #[must_use]
    pub const fn new(field: S::Field) -> Self {
        Self {
            field,
            _phantom: PhantomData,
        }
    }

    /// Get the field's wire name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        S::field_name(self.field)
    }

    /// The schema key this reference points at.
    #[must_use]
    pub fn field(&self) -> S::Field {
        self.field
    }

    /// Owned single-segment path for this field.
    #[must_use]
    pub fn path(self) -> FieldPath<T> {
        FieldPath::from_raw(self.name())
    }

    /// Step into a nested entity field: `address` + `street` = `address/street`.
    #[must_use]
    pub fn at<U>(self, inner: FieldRef<T::Schema, U>) -> FieldPath<U>
    where
        T: ODataEntity,
    {
        self.path().at(inner)
    }
}

impl<S: Schema, T> Clone for FieldRef<S, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: Schema, T> Copy for FieldRef<S, T> {}

impl<S: Schema, T> std::fmt::Debug for FieldRef<S, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldRef")
            .field("field", &self.name())
            .finish()
    }
}

impl<S: Schema, T> PartialEq for FieldRef<S, T> {
    fn eq(&self, other: &Self) -> bool {
        self.field == other.field
    }
}

impl<S: Schema, T> Eq for FieldRef<S, T> {}

impl<S: Schema, T> AsFieldPath for FieldRef<S, T> {
    fn as_field_path(&self) -> &str {
        self.name()
    }
}

/// Owned, slash-joined path to a (possibly nested) field of type `T`.
pub struct FieldPath<T> {
    path: String,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> FieldPath<T> {
    /// Wrap an already resolved path. No validation is performed.
    #[must_use]
    pub fn from_raw(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            _phantom: PhantomData,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.path
    }

    /// Append a field of the nested entity.
    #[must_use]
    pub fn at<U>(mut self, inner: FieldRef<T::Schema, U>) -> FieldPath<U>
    where
        T: ODataEntity,
    {
        self.path.push('/');
        self.path.push_str(inner.name());
        FieldPath::from_raw(self.path)
    }
}

impl<T> Clone for FieldPath<T> {
    fn clone(&self) -> Self {
        Self::from_raw(self.path.clone())
    }
}

impl<T> std::fmt::Debug for FieldPath<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("FieldPath").field(&self.path).finish()
    }
}

impl<T> PartialEq for FieldPath<T> {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl<T> Eq for FieldPath<T> {}

impl<T> AsFieldPath for FieldPath<T> {
    fn as_field_path(&self) -> &str {
        &self.path
    }
}

impl<S: Schema, T> From<FieldRef<S, T>> for FieldPath<T> {
    fn from(field: FieldRef<S, T>) -> Self {
        field.path()
    }
}

/// Trait for types that can be converted to `OData` literal values.
pub trait IntoODataValue {
    /// Convert this value into an `OData` literal value.
    fn into_odata_value(self) -> Value;
}

impl IntoODataValue for Value {
    fn into_odata_value(self) -> Value {
        self
    }
}

impl IntoODataValue for bool {
    fn into_odata_value(self) -> Value {
        Value::Bool(self)
    }
}

impl IntoODataValue for uuid::Uuid {
    fn into_odata_value(self) -> Value {
        Value::Uuid(self)
    }
}

impl IntoODataValue for String {
    fn into_odata_value(self) -> Value {
        Value::String(self)
    }
}

impl IntoODataValue for &str {
    fn into_odata_value(self) -> Value {
        Value::String(self.to_owned())
    }
}

impl IntoODataValue for BigDecimal {
    fn into_odata_value(self) -> Value {
        Value::Number(self)
    }
}

macro_rules! impl_number_value {
    ($($t:ty),* $(,)?) => {
        $(
            impl IntoODataValue for $t {
                fn into_odata_value(self) -> Value {
                    Value::Number(self.into())
                }
            }
        )*
    };
}

impl_number_value!(i8, i16, i32, i64, u8, u16, u32, u64);

impl IntoODataValue for chrono::DateTime<chrono::Utc> {
    fn into_odata_value(self) -> Value {
        Value::DateTime(self)
    }
}

impl IntoODataValue for chrono::NaiveDate {
    fn into_odata_value(self) -> Value {
        Value::Date(self)
    }
}

impl IntoODataValue for chrono::NaiveTime {
    fn into_odata_value(self) -> Value {
        Value::Time(self)
    }
}

impl<V: IntoODataValue> IntoODataValue for Option<V> {
    fn into_odata_value(self) -> Value {
        self.map_or(Value::Null, IntoODataValue::into_odata_value)
    }
}

/// Field types that accept the string functions (`contains`, `startswith`, `endswith`).
pub trait TextField {}

impl TextField for String {}

impl TextField for Option<String> {}

fn compare(path: &str, op: &str, value: &Value) -> FilterExpr {
    FilterExpr::new(format!("{path} {op} {value}"))
}

fn call(function: &str, path: &str, text: &str) -> FilterExpr {
    FilterExpr::new(format!(
        "{function}({path}, {})",
        Value::String(text.to_owned())
    ))
}

fn in_list<V, I>(path: &str, values: I) -> FilterExpr
where
    V: IntoODataValue,
    I: IntoIterator<Item = V>,
{
    let items: Vec<String> = values
        .into_iter()
        .map(|v| v.into_odata_value().to_string())
        .collect();
    FilterExpr::new(format!("{path} in ({})", items.join(", ")))
}

/// Comparison, null-check and ordering helpers for any field type.
impl<T> FieldPath<T> {
    /// `path eq value`
    pub fn eq<V: IntoODataValue>(&self, value: V) -> FilterExpr {
        compare(&self.path, "eq", &value.into_odata_value())
    }

    /// `path ne value`
    pub fn ne<V: IntoODataValue>(&self, value: V) -> FilterExpr {
        compare(&self.path, "ne", &value.into_odata_value())
    }

    /// `path gt value`
    pub fn gt<V: IntoODataValue>(&self, value: V) -> FilterExpr {
        compare(&self.path, "gt", &value.into_odata_value())
    }

    /// `path ge value`
    pub fn ge<V: IntoODataValue>(&self, value: V) -> FilterExpr {
        compare(&self.path, "ge", &value.into_odata_value())
    }

    /// `path lt value`
    pub fn lt<V: IntoODataValue>(&self, value: V) -> FilterExpr {
        compare(&self.path, "lt", &value.into_odata_value())
    }

    /// `path le value`
    pub fn le<V: IntoODataValue>(&self, value: V) -> FilterExpr {
        compare(&self.path, "le", &value.into_odata_value())
    }

    /// `path eq null`
    pub fn is_null(&self) -> FilterExpr {
        compare(&self.path, "eq", &Value::Null)
    }

    /// `path ne null`
    pub fn is_not_null(&self) -> FilterExpr {
        compare(&self.path, "ne", &Value::Null)
    }

    /// `path in (v1, v2, ...)`
    pub fn in_list<V, I>(&self, values: I) -> FilterExpr
    where
        V: IntoODataValue,
        I: IntoIterator<Item = V>,
    {
        in_list(&self.path, values)
    }

    /// `path asc`
    #[must_use]
    pub fn asc(&self) -> OrderKey {
        OrderKey::new(self.path.clone(), Some(SortDir::Asc))
    }

    /// `path desc`
    #[must_use]
    pub fn desc(&self) -> OrderKey {
        OrderKey::new(self.path.clone(), Some(SortDir::Desc))
    }
}

/// String functions, only available for text fields.
impl<T: TextField> FieldPath<T> {
    /// `contains(path, 'text')`
    pub fn contains(&self, substring: &str) -> FilterExpr {
        call("contains", &self.path, substring)
    }

    /// `startswith(path, 'text')`
    pub fn startswith(&self, prefix: &str) -> FilterExpr {
        call("startswith", &self.path, prefix)
    }

    /// `endswith(path, 'text')`
    pub fn endswith(&self, suffix: &str) -> FilterExpr {
        call("endswith", &self.path, suffix)
    }
}

/// Comparison operations for any field type.
impl<S: Schema, T> FieldRef<S, T> {
    /// Create an equality comparison: `field eq value`
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let filter = ID.eq(user_id);
    /// ```
    pub fn eq<V: IntoODataValue>(self, value: V) -> FilterExpr {
        compare(self.name(), "eq", &value.into_odata_value())
    }

    /// Create a not-equal comparison: `field ne value`
    pub fn ne<V: IntoODataValue>(self, value: V) -> FilterExpr {
        compare(self.name(), "ne", &value.into_odata_value())
    }

    /// Create a greater-than comparison: `field gt value`
    pub fn gt<V: IntoODataValue>(self, value: V) -> FilterExpr {
        compare(self.name(), "gt", &value.into_odata_value())
    }

    /// Create a greater-than-or-equal comparison: `field ge value`
    pub fn ge<V: IntoODataValue>(self, value: V) -> FilterExpr {
        compare(self.name(), "ge", &value.into_odata_value())
    }

    /// Create a less-than comparison: `field lt value`
    pub fn lt<V: IntoODataValue>(self, value: V) -> FilterExpr {
        compare(self.name(), "lt", &value.into_odata_value())
    }

    /// Create a less-than-or-equal comparison: `field le value`
    pub fn le<V: IntoODataValue>(self, value: V) -> FilterExpr {
        compare(self.name(), "le", &value.into_odata_value())
    }

    /// Create a null check: `field eq null`
    pub fn is_null(self) -> FilterExpr {
        compare(self.name(), "eq", &Value::Null)
    }

    /// Create a not-null check: `field ne null`
    pub fn is_not_null(self) -> FilterExpr {
        compare(self.name(), "ne", &Value::Null)
    }

    /// Create a membership test: `field in (v1, v2)`
    pub fn in_list<V, I>(self, values: I) -> FilterExpr
    where
        V: IntoODataValue,
        I: IntoIterator<Item = V>,
    {
        in_list(self.name(), values)
    }

    /// Ascending sort key: `field asc`
    #[must_use]
    pub fn asc(self) -> OrderKey {
        OrderKey::new(self.name(), Some(SortDir::Asc))
    }

    /// Descending sort key: `field desc`
    #[must_use]
    pub fn desc(self) -> OrderKey {
        OrderKey::new(self.name(), Some(SortDir::Desc))
    }
}

/// String-specific operations (only available for text fields).
impl<S: Schema, T: TextField> FieldRef<S, T> {
    /// Create a contains function call: `contains(field, 'value')`
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let filter = NAME.contains("john");
    /// ```
    pub fn contains(self, substring: &str) -> FilterExpr {
        call("contains", self.name(), substring)
    }

    /// Create a startswith function call: `startswith(field, 'prefix')`
    pub fn startswith(self, prefix: &str) -> FilterExpr {
        call("startswith", self.name(), prefix)
    }

    /// Create an endswith function call: `endswith(field, 'suffix')`
    pub fn endswith(self, suffix: &str) -> FilterExpr {
        call("endswith", self.name(), suffix)
    }
}
