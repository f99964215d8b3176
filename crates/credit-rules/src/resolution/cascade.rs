use serde_json::Value;
use tracing::warn;

use super::catalog::{FieldMapping, FieldSource};
use super::{ResolutionInputs, SourceTag};

/// Everything a tier may look at for one field.
pub(crate) struct Lookup<'a> {
    pub(crate) field: &'a str,
    pub(crate) mapping: Option<&'a FieldMapping>,
    pub(crate) inputs: &'a ResolutionInputs,
}

impl Lookup<'_> {
    fn declared(&self, source: FieldSource) -> Option<&FieldMapping> {
        self.mapping.filter(|mapping| mapping.source == source)
    }
}

/// One source in the resolution order: a predicate deciding whether it applies to the
/// field, and an extractor returning a usable value.
pub(crate) struct Tier {
    pub(crate) source: SourceTag,
    pub(crate) applies: fn(&Lookup<'_>) -> bool,
    pub(crate) extract: fn(&Lookup<'_>) -> Option<Value>,
}

/// Tiers in precedence order; the first that applies and yields a value wins.
pub(crate) const CASCADE: [Tier; 7] = [
    Tier {
        source: SourceTag::UserInput,
        applies: |_| true,
        extract: |lookup| usable(lookup.inputs.form_data.get(lookup.field)),
    },
    Tier {
        source: SourceTag::Customer360,
        applies: |lookup| {
            lookup.declared(FieldSource::Customer360).is_some()
                && lookup.inputs.customer_data.is_some()
        },
        extract: |lookup| {
            let mapping = lookup.declared(FieldSource::Customer360)?;
            let data = lookup.inputs.customer_data.as_ref()?;
            usable(mapping.extract_from(data).as_ref())
        },
    },
    Tier {
        source: SourceTag::Calculated,
        applies: |lookup| lookup.declared(FieldSource::Calculated).is_some(),
        extract: calculate,
    },
    Tier {
        source: SourceTag::System,
        applies: |lookup| {
            lookup.declared(FieldSource::System).is_some() && lookup.inputs.system_data.is_some()
        },
        extract: |lookup| {
            let data = lookup.inputs.system_data.as_ref()?;
            usable(data.get(lookup.field))
        },
    },
    Tier {
        source: SourceTag::SystemCalculated,
        applies: |lookup| lookup.declared(FieldSource::System).is_some(),
        extract: calculate,
    },
    Tier {
        source: SourceTag::AutoFetched,
        applies: |lookup| {
            lookup.declared(FieldSource::AutoFetched).is_some()
                && lookup.inputs.auto_fetched_data.is_some()
        },
        extract: |lookup| {
            let data = lookup.inputs.auto_fetched_data.as_ref()?;
            usable(data.get(lookup.field))
        },
    },
    Tier {
        source: SourceTag::FallbackDefault,
        applies: |lookup| lookup.mapping.is_some_and(|mapping| mapping.fallback.is_some()),
        extract: |lookup| {
            lookup
                .mapping
                .and_then(|mapping| mapping.fallback)
                .map(|fallback| fallback.to_value())
        },
    },
];

/// Run the field's calculation. Failures are logged and treated as "no value".
fn calculate(lookup: &Lookup<'_>) -> Option<Value> {
    let calculation = lookup.mapping?.calculation?;
    match calculation(
        &lookup.inputs.form_data,
        lookup.inputs.customer_data.as_ref(),
    ) {
        Ok(value) => usable(value.as_ref()),
        Err(err) => {
            warn!(field = lookup.field, error = %err, "field calculation failed");
            None
        }
    }
}

/// Defined and non-empty: not null and not a blank string.
fn usable(value: Option<&Value>) -> Option<Value> {
    match value? {
        Value::Null => None,
        Value::String(text) if text.trim().is_empty() => None,
        other => Some(other.clone()),
    }
}
