use crate::ValueSummary;
use crate::wire::error::WireError;
use crate::wire::value::{Basic, Value, Values};

pub(super) fn summarize_values(values: Values<'_>) -> Result<Vec<ValueSummary>, WireError> {
    values.map(|value| summarize(value?)).collect()
}

/// Copy a validated value into its owned report form.
///
/// Nesting is bounded by the decoder's depth limit.
pub(super) fn summarize(value: Value<'_>) -> Result<ValueSummary, WireError> {
    let summary = match value {
        Value::Basic(basic) => summarize_basic(basic),
        Value::Array(array) => ValueSummary::Array {
            signature: array.element_signature().to_string(),
            elements: array
                .iter()
                .map(|element| summarize(element?))
                .collect::<Result<_, _>>()?,
        },
        Value::Struct(record) => ValueSummary::Struct {
            fields: summarize_values(record.fields())?,
        },
        Value::DictEntry(entry) => ValueSummary::DictEntry {
            key: Box::new(summarize_basic(entry.key())),
            value: Box::new(summarize(entry.value()?)?),
        },
        Value::Variant(variant) => ValueSummary::Variant {
            signature: variant.signature().to_string(),
            value: Box::new(summarize(variant.value()?)?),
        },
    };
    Ok(summary)
}

fn summarize_basic(basic: Basic<'_>) -> ValueSummary {
    match basic {
        Basic::Byte(value) => ValueSummary::Byte { value },
        Basic::Boolean(value) => ValueSummary::Boolean { value },
        Basic::Int16(value) => ValueSummary::Int16 { value },
        Basic::UInt16(value) => ValueSummary::Uint16 { value },
        Basic::Int32(value) => ValueSummary::Int32 { value },
        Basic::UInt32(value) => ValueSummary::Uint32 { value },
        Basic::Int64(value) => ValueSummary::Int64 { value },
        Basic::UInt64(value) => ValueSummary::Uint64 { value },
        Basic::Double(value) => ValueSummary::Double { value },
        Basic::Float(value) => ValueSummary::Float { value },
        Basic::Token(value) => ValueSummary::Token { value },
        Basic::Str(text) => ValueSummary::String {
            value: text.to_string(),
        },
        Basic::ObjectPath(text) => ValueSummary::ObjectPath {
            value: text.to_string(),
        },
        Basic::Signature(text) => ValueSummary::Signature {
            value: text.to_string(),
        },
    }
}
