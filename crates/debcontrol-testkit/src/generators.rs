//! Proptest generators for property-based testing.
//!
//! Values produced here survive a render/parse cycle unchanged: keys
//! contain no colon and no surrounding whitespace, and no value line
//! looks like a comment or carries edge whitespace.

use proptest::prelude::*;

use debcontrol_core::{
    ControlRecord, FieldDescriptor, FieldValue, Paragraph, Schema, ToFieldValue,
};
use debcontrol_sign::SigningKeypair;

/// Generate a random signing keypair.
pub fn keypair() -> impl Strategy<Value = SigningKeypair> {
    any::<[u8; 32]>().prop_map(|seed| SigningKeypair::from_seed(&seed))
}

/// Generate a field key.
pub fn field_key() -> impl Strategy<Value = String> {
    "[A-Z][A-Za-z0-9-]{0,15}".prop_map(String::from)
}

/// Generate one non-empty line of a value.
pub fn value_line() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9]([a-zA-Z0-9 ,.()<>=+~-]{0,30}[a-zA-Z0-9)])?".prop_map(String::from)
}

/// Generate a multi-line value; later lines may be empty.
pub fn field_value() -> impl Strategy<Value = String> {
    (
        value_line(),
        prop::collection::vec(prop_oneof![3 => value_line(), 1 => Just(String::new())], 0..4),
    )
        .prop_map(|(first, rest)| {
            let mut value = first;
            for line in rest {
                value.push('\n');
                value.push_str(&line);
            }
            value
        })
}

/// Generate a paragraph with distinct keys.
pub fn paragraph() -> impl Strategy<Value = Paragraph> {
    prop::collection::btree_map(field_key(), field_value(), 1..8)
        .prop_map(|fields| Paragraph::from_fields(fields))
}

/// Generate a non-empty list of paragraphs.
pub fn paragraphs(max: usize) -> impl Strategy<Value = Vec<Paragraph>> {
    prop::collection::vec(paragraph(), 1..=max.max(1))
}

/// A generic record used to drive the mapper in property tests.
#[derive(Debug, Clone)]
pub struct RecordParams {
    pub name: String,
    pub version: Option<String>,
    pub size: u64,
    pub depends: Vec<String>,
    pub description: String,
}

impl ControlRecord for RecordParams {
    fn schema() -> Schema<Self> {
        Schema::new()
            .field(FieldDescriptor::new("name", |r: &RecordParams| r.name.to_field_value()).key("Package"))
            .field(FieldDescriptor::new("Version", |r: &RecordParams| r.version.to_field_value()))
            .field(FieldDescriptor::new("Installed-Size", |r: &RecordParams| {
                r.size.to_field_value()
            }))
            .field(
                FieldDescriptor::new("Depends", |r: &RecordParams| r.depends.to_field_value())
                    .delimiter(", "),
            )
            .field(FieldDescriptor::new("Description", |r: &RecordParams| {
                r.description.to_field_value()
            }))
            .field(
                FieldDescriptor::new("Checksum", |_: &RecordParams| FieldValue::Unsupported("[u8; 32]"))
                    .skip(),
            )
    }
}

impl RecordParams {
    /// The `key -> value` pairs a parse of the rendered record must yield.
    pub fn expected_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![("Package", self.name.clone())];
        if let Some(version) = &self.version {
            fields.push(("Version", version.clone()));
        }
        fields.push(("Installed-Size", self.size.to_string()));
        if !self.depends.is_empty() {
            fields.push(("Depends", self.depends.join(", ")));
        }
        fields.push(("Description", self.description.clone()));
        fields
    }
}

impl Arbitrary for RecordParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            "[a-z][a-z0-9.+-]{1,20}",
            proptest::option::of("[0-9]{1,2}\\.[0-9]{1,2}-[0-9]"),
            any::<u64>(),
            prop::collection::vec("[a-z][a-z0-9-]{1,12}", 0..4),
            field_value(),
        )
            .prop_map(|(name, version, size, depends, description)| RecordParams {
                name,
                version,
                size,
                depends,
                description,
            })
            .boxed()
    }
}
