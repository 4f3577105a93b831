//! Search requests: query-string coercion and cross-field checks.
//!
//! HTTP query parameters arrive as strings. [`SearchRequest::from_query`] types
//! them according to the entity's [`FilterSpec`](crate::filter::FilterSpec) and
//! rejects inverted ranges (`minEmployees > maxEmployees`) before any SQL is
//! built.

use crate::error::{JoblyError, JoblyResult};
use crate::field_map::FieldMap;
use crate::filter::{EntityKind, FilterSpec, ParamKind, build_where_fragment_with};
use crate::fragment::Fragment;
use crate::value::FieldValue;

/// A validated set of search parameters for one entity.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    kind: EntityKind,
    spec: FilterSpec,
    params: FieldMap,
}

impl SearchRequest {
    /// Parse raw `(key, value)` query pairs, in the order given.
    ///
    /// Keys are checked against the entity's filter spec first; empty values
    /// of recognized keys are then skipped. A repeated key keeps its first
    /// position and takes the last value.
    pub fn from_query<'a, I>(kind: EntityKind, pairs: I) -> JoblyResult<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let spec = kind.filter_spec();
        let mut params = FieldMap::new();
        for (key, raw) in pairs {
            let Some(rule) = spec.lookup(key)? else {
                continue;
            };
            if raw.is_empty() {
                continue;
            }
            params.insert(key, coerce(key, raw, rule.kind)?);
        }
        Self::validated(kind, spec, params)
    }

    /// Wrap already-typed parameters.
    pub fn from_fields(kind: EntityKind, params: FieldMap) -> JoblyResult<Self> {
        Self::validated(kind, kind.filter_spec(), params)
    }

    /// Use a custom filter spec instead of the entity's built-in one.
    pub fn with_spec(kind: EntityKind, spec: FilterSpec, params: FieldMap) -> JoblyResult<Self> {
        Self::validated(kind, spec, params)
    }

    fn validated(kind: EntityKind, spec: FilterSpec, params: FieldMap) -> JoblyResult<Self> {
        check_ranges(&params, &spec)?;
        Ok(Self { kind, spec, params })
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn params(&self) -> &FieldMap {
        &self.params
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Build the `WHERE` predicate for this request.
    pub fn where_fragment(&self) -> JoblyResult<Fragment> {
        build_where_fragment_with(&self.params, &self.spec)
    }
}

/// Fail with `range inverted` when a lower bound exceeds its upper bound.
///
/// Bounds that are missing or non-numeric are not compared.
pub fn check_ranges(params: &FieldMap, spec: &FilterSpec) -> JoblyResult<()> {
    for pair in spec.ranges() {
        let (Some(min), Some(max)) = (params.get(&pair.min_param), params.get(&pair.max_param))
        else {
            continue;
        };
        if is_inverted(min, max) {
            return Err(JoblyError::range_inverted(&pair.min_param, &pair.max_param));
        }
    }
    Ok(())
}

// Integers compare exactly; anything else numeric goes through f64.
fn is_inverted(min: &FieldValue, max: &FieldValue) -> bool {
    if let (Some(min), Some(max)) = (min.as_i64(), max.as_i64()) {
        return min > max;
    }
    match (min.as_f64(), max.as_f64()) {
        (Some(min), Some(max)) => min > max,
        _ => false,
    }
}

fn coerce(key: &str, raw: &str, kind: ParamKind) -> JoblyResult<FieldValue> {
    match kind {
        ParamKind::Text => Ok(FieldValue::Text(raw.to_string())),
        ParamKind::Integer => raw.trim().parse::<i64>().map(FieldValue::Int).map_err(|e| {
            JoblyError::invalid(format!("invalid value for {key}: {raw:?} ({e})"))
        }),
        ParamKind::Boolean => match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(FieldValue::Bool(true)),
            "false" | "0" | "no" | "off" => Ok(FieldValue::Bool(false)),
            _ => Err(JoblyError::invalid(format!(
                "invalid value for {key}: {raw:?} (expected a boolean)"
            ))),
        },
    }
}
