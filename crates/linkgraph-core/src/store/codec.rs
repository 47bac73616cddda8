use crate::value::Value;
use std::collections::BTreeSet;

///
/// ColumnCodec
///
/// Storage-boundary decoding applied by the field resolver. Computed fields
/// only ever see the decoded form.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ColumnCodec {
    #[default]
    Plain,

    /// Enum set stored as a JSON array of discriminants, e.g. `"[2,3]"`.
    JsonEnumSet,
}

impl ColumnCodec {
    /// Decode one stored value; `Err` carries a corruption message.
    pub fn decode(self, value: Value) -> Result<Value, String> {
        match (self, value) {
            (Self::Plain, value) | (Self::JsonEnumSet, value @ Value::Null) => Ok(value),
            (Self::JsonEnumSet, Value::Text(text)) => decode_enum_set(&text)
                .map(Value::EnumSet)
                .map_err(|e| e.to_string()),
            (Self::JsonEnumSet, other) => Err(format!("expected JSON text, found {other:?}")),
        }
    }
}

/// Encode an enum set into its stored JSON text.
#[must_use]
pub fn encode_enum_set(values: &BTreeSet<i64>) -> String {
    let items = values.iter().map(i64::to_string).collect::<Vec<_>>();

    format!("[{}]", items.join(","))
}

/// Decode stored JSON text into an enum set.
pub fn decode_enum_set(text: &str) -> Result<BTreeSet<i64>, serde_json::Error> {
    serde_json::from_str(text)
}
