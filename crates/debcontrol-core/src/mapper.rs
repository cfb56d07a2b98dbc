//! Structural mapper: renders typed records as paragraph text.
//!
//! Records describe themselves with an explicit [`Schema`]: an ordered
//! list of [`FieldDescriptor`]s, each carrying an accessor plus the
//! paragraph key, skip/embedded flags and the sequence delimiter.
//!
//! Values are rendered by category:
//!
//! - text: verbatim
//! - integer: base-10
//! - sequence: each element rendered, joined with the field delimiter
//! - custom: delegated to [`MarshalControl`]
//!
//! Anything else fails with [`MarshalError::UnsupportedType`].
//!
//! ```
//! use debcontrol_core::{render, ControlRecord, FieldDescriptor, Schema, ToFieldValue};
//!
//! struct Source {
//!     name: String,
//!     binaries: Vec<String>,
//! }
//!
//! impl ControlRecord for Source {
//!     fn schema() -> Schema<Self> {
//!         Schema::new()
//!             .field(FieldDescriptor::new("Source", |s: &Source| s.name.to_field_value()))
//!             .field(
//!                 FieldDescriptor::new("Binary", |s: &Source| s.binaries.to_field_value())
//!                     .delimiter(", "),
//!             )
//!     }
//! }
//!
//! let source = Source {
//!     name: "hello".into(),
//!     binaries: vec!["hello".into(), "hello-doc".into()],
//! };
//! assert_eq!(render(&source).unwrap(), "Source: hello\nBinary: hello, hello-doc\n");
//! ```

use std::borrow::Cow;
use std::rc::Rc;
use std::sync::Arc;

use crate::error::MarshalError;
use crate::escape::escape_value;

/// Default delimiter for sequence values.
pub const DEFAULT_DELIMITER: &str = " ";

/// Custom render capability for values with their own textual form.
pub trait MarshalControl {
    fn marshal_control(&self) -> Result<String, MarshalError>;
}

/// A record type that can be rendered as one paragraph.
pub trait ControlRecord {
    /// The record's field layout, in output order.
    fn schema() -> Schema<Self>
    where
        Self: Sized;
}

/// A field value as seen by the mapper.
pub enum FieldValue<'a> {
    Text(Cow<'a, str>),
    Integer(i128),
    Sequence(Vec<FieldValue<'a>>),
    Custom(&'a dyn MarshalControl),
    /// A pointer-like wrapper around another value.
    Indirect(Box<FieldValue<'a>>),
    Unsupported(&'static str),
}

impl FieldValue<'_> {
    /// Name of the value's category, used in error messages.
    fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "text",
            FieldValue::Integer(_) => "integer",
            FieldValue::Sequence(_) => "sequence",
            FieldValue::Custom(_) => "custom",
            FieldValue::Indirect(_) => "indirection",
            FieldValue::Unsupported(name) => *name,
        }
    }
}

impl std::fmt::Debug for FieldValue<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Text(s) => f.debug_tuple("Text").field(s).finish(),
            FieldValue::Integer(i) => f.debug_tuple("Integer").field(i).finish(),
            FieldValue::Sequence(items) => f.debug_tuple("Sequence").field(items).finish(),
            FieldValue::Custom(_) => f.write_str("Custom(..)"),
            FieldValue::Indirect(inner) => f.debug_tuple("Indirect").field(inner).finish(),
            FieldValue::Unsupported(name) => f.debug_tuple("Unsupported").field(name).finish(),
        }
    }
}

/// Conversion of a Rust value into a [`FieldValue`].
///
/// References and smart pointers present as one level of indirection.
/// The renderer follows one level for a field and one for each sequence
/// element, so `&str` fields and `Vec<&str>` render as text while
/// `Box<&str>` is unsupported.
pub trait ToFieldValue {
    fn to_field_value(&self) -> FieldValue<'_>;
}

impl ToFieldValue for str {
    fn to_field_value(&self) -> FieldValue<'_> {
        FieldValue::Text(Cow::Borrowed(self))
    }
}

impl ToFieldValue for String {
    fn to_field_value(&self) -> FieldValue<'_> {
        FieldValue::Text(Cow::Borrowed(self.as_str()))
    }
}

impl ToFieldValue for Cow<'_, str> {
    fn to_field_value(&self) -> FieldValue<'_> {
        FieldValue::Text(Cow::Borrowed(self.as_ref()))
    }
}

impl ToFieldValue for char {
    fn to_field_value(&self) -> FieldValue<'_> {
        FieldValue::Text(Cow::Owned(self.to_string()))
    }
}

macro_rules! impl_integer {
    ($($t:ty),*) => {
        $(
            impl ToFieldValue for $t {
                fn to_field_value(&self) -> FieldValue<'_> {
                    FieldValue::Integer(i128::from(*self))
                }
            }
        )*
    };
}

impl_integer!(i8, i16, i32, i64, u8, u16, u32, u64);

impl ToFieldValue for isize {
    fn to_field_value(&self) -> FieldValue<'_> {
        FieldValue::Integer(*self as i128)
    }
}

impl ToFieldValue for usize {
    fn to_field_value(&self) -> FieldValue<'_> {
        FieldValue::Integer(*self as i128)
    }
}

macro_rules! impl_unsupported {
    ($($t:ty),*) => {
        $(
            impl ToFieldValue for $t {
                fn to_field_value(&self) -> FieldValue<'_> {
                    FieldValue::Unsupported(stringify!($t))
                }
            }
        )*
    };
}

impl_unsupported!(bool, f32, f64);

impl<T: ToFieldValue> ToFieldValue for [T] {
    fn to_field_value(&self) -> FieldValue<'_> {
        FieldValue::Sequence(self.iter().map(ToFieldValue::to_field_value).collect())
    }
}

impl<T: ToFieldValue> ToFieldValue for Vec<T> {
    fn to_field_value(&self) -> FieldValue<'_> {
        self.as_slice().to_field_value()
    }
}

/// `None` renders as empty text, so the field line is omitted.
impl<T: ToFieldValue> ToFieldValue for Option<T> {
    fn to_field_value(&self) -> FieldValue<'_> {
        match self {
            Some(value) => value.to_field_value(),
            None => FieldValue::Text(Cow::Borrowed("")),
        }
    }
}

impl<T: ToFieldValue + ?Sized> ToFieldValue for &T {
    fn to_field_value(&self) -> FieldValue<'_> {
        FieldValue::Indirect(Box::new((**self).to_field_value()))
    }
}

impl<T: ToFieldValue + ?Sized> ToFieldValue for Box<T> {
    fn to_field_value(&self) -> FieldValue<'_> {
        FieldValue::Indirect(Box::new((**self).to_field_value()))
    }
}

impl<T: ToFieldValue + ?Sized> ToFieldValue for Rc<T> {
    fn to_field_value(&self) -> FieldValue<'_> {
        FieldValue::Indirect(Box::new((**self).to_field_value()))
    }
}

impl<T: ToFieldValue + ?Sized> ToFieldValue for Arc<T> {
    fn to_field_value(&self) -> FieldValue<'_> {
        FieldValue::Indirect(Box::new((**self).to_field_value()))
    }
}

/// Accessor from a record to one of its field values.
pub type Accessor<T> = for<'a> fn(&'a T) -> FieldValue<'a>;

/// Metadata for one record field.
pub struct FieldDescriptor<T> {
    name: &'static str,
    key: Option<&'static str>,
    skip: bool,
    embedded: bool,
    delimiter: &'static str,
    accessor: Accessor<T>,
}

impl<T> FieldDescriptor<T> {
    /// A field keyed by its own name, joined with a single space if it is a sequence.
    pub fn new(name: &'static str, accessor: Accessor<T>) -> Self {
        Self {
            name,
            key: None,
            skip: false,
            embedded: false,
            delimiter: DEFAULT_DELIMITER,
            accessor,
        }
    }

    /// Use a different paragraph key than the field name.
    pub fn key(mut self, key: &'static str) -> Self {
        self.key = Some(key);
        self
    }

    /// Never render this field.
    pub fn skip(mut self) -> Self {
        self.skip = true;
        self
    }

    /// Mark the field as an embedded composition that contributes no key.
    pub fn embedded(mut self) -> Self {
        self.embedded = true;
        self
    }

    /// Delimiter used to join sequence elements.
    pub fn delimiter(mut self, delimiter: &'static str) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The paragraph key: the override if set, else the field name.
    pub fn resolved_key(&self) -> &'static str {
        self.key.unwrap_or(self.name)
    }

    pub fn is_skipped(&self) -> bool {
        self.skip || self.embedded
    }
}

impl<T> std::fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("key", &self.key)
            .field("skip", &self.skip)
            .field("embedded", &self.embedded)
            .field("delimiter", &self.delimiter)
            .finish()
    }
}

/// Ordered field layout for a record type.
#[derive(Debug)]
pub struct Schema<T> {
    fields: Vec<FieldDescriptor<T>>,
}

impl<T> Schema<T> {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Append a field.
    pub fn field(mut self, descriptor: FieldDescriptor<T>) -> Self {
        self.fields.push(descriptor);
        self
    }

    pub fn fields(&self) -> &[FieldDescriptor<T>] {
        &self.fields
    }
}

impl<T> Default for Schema<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a record using its own schema.
pub fn render<T: ControlRecord>(record: &T) -> Result<String, MarshalError> {
    render_with(record, &T::schema())
}

/// Render a record with an explicit schema.
///
/// Fails on the first unsupported field; no partial text is returned.
///
/// A value line that starts with `#` (after leading whitespace) is read
/// back as a comment and dropped by the scanner, so such values do not
/// survive a render/parse cycle.
pub fn render_with<T>(record: &T, schema: &Schema<T>) -> Result<String, MarshalError> {
    let mut out = String::new();

    for descriptor in schema.fields() {
        if descriptor.is_skipped() {
            continue;
        }

        let rendered = render_value(deref_once((descriptor.accessor)(record)), descriptor)?;
        let escaped = escape_value(&rendered);
        if escaped.is_empty() {
            tracing::trace!(field = descriptor.name(), "omitting empty field");
            continue;
        }

        out.push_str(descriptor.resolved_key());
        out.push_str(": ");
        out.push_str(&escaped);
        out.push('\n');
    }

    Ok(out)
}

/// Render several records as one document, paragraphs separated by a blank line.
pub fn render_all<'r, T, I>(records: I) -> Result<String, MarshalError>
where
    T: ControlRecord + 'r,
    I: IntoIterator<Item = &'r T>,
{
    let schema = T::schema();
    let paragraphs = records
        .into_iter()
        .map(|record| render_with(record, &schema))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(paragraphs.join("\n"))
}

/// Follow a single level of indirection.
fn deref_once(value: FieldValue<'_>) -> FieldValue<'_> {
    match value {
        FieldValue::Indirect(inner) => *inner,
        value => value,
    }
}

fn render_value<T>(value: FieldValue<'_>, descriptor: &FieldDescriptor<T>) -> Result<String, MarshalError> {
    match value {
        FieldValue::Text(text) => Ok(text.into_owned()),
        FieldValue::Integer(n) => Ok(n.to_string()),
        FieldValue::Sequence(items) => {
            let rendered = items
                .into_iter()
                .map(|item| render_value(deref_once(item), descriptor))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rendered.join(descriptor.delimiter))
        }
        FieldValue::Custom(custom) => custom.marshal_control(),
        other => Err(MarshalError::UnsupportedType {
            field: descriptor.name().to_string(),
            type_name: other.type_name().to_string(),
        }),
    }
}
