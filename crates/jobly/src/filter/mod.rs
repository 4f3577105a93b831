//! Search predicates.
//!
//! A [`FilterSpec`] lists the query parameters an entity recognizes and how each
//! one turns into a `WHERE` clause. [`build_where_fragment_with`] applies a spec
//! to caller-supplied parameters and yields a [`Fragment`] such as
//! `name ILIKE $1 AND num_employees >= $2`.
//!
//! Placeholders are numbered over the clauses actually emitted: a parameter
//! that is skipped (a falsy `WhenTruthy` flag) consumes no index.

mod entity;


pub use entity::EntityKind;

use crate::error::{JoblyError, JoblyResult};
use crate::field_map::FieldMap;
use crate::fragment::{Fragment, FragmentBuilder};
use crate::ident::{Ident, IntoIdent};
use crate::value::FieldValue;

/// Comparison operator of a filter clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// Case-insensitive pattern match (PostgreSQL ILIKE)
    ILike,
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl Comparison {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::ILike => "ILIKE",
            Self::Eq => "=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
        }
    }
}

/// How the supplied value becomes the bound value.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueTransform {
    Identity,
    /// Substring match: `v` binds as `%v%`.
    Contains,
    /// Bind a fixed value; the supplied value only decides participation.
    Constant(FieldValue),
}

impl ValueTransform {
    fn apply(&self, value: &FieldValue) -> FieldValue {
        match self {
            Self::Identity => value.clone(),
            Self::Contains => FieldValue::Text(format!("%{value}%")),
            Self::Constant(c) => c.clone(),
        }
    }
}

/// When a recognized parameter contributes a clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Participation {
    #[default]
    Always,
    /// Only when the value is truthy; otherwise the parameter is skipped.
    WhenTruthy,
}

/// Type a raw query-string value is coerced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamKind {
    #[default]
    Text,
    Integer,
    Boolean,
}

/// One recognized filter parameter.
#[derive(Debug, Clone)]
pub struct FilterRule {
    pub param: String,
    pub column: Ident,
    pub comparison: Comparison,
    pub transform: ValueTransform,
    pub participation: Participation,
    pub kind: ParamKind,
}

impl FilterRule {
    pub fn new<I: IntoIdent>(param: &str, column: I, comparison: Comparison) -> JoblyResult<Self> {
        Ok(Self {
            param: param.to_string(),
            column: column.into_ident()?,
            comparison,
            transform: ValueTransform::Identity,
            participation: Participation::Always,
            kind: ParamKind::Text,
        })
    }

    pub fn transform(mut self, transform: ValueTransform) -> Self {
        self.transform = transform;
        self
    }

    pub fn participation(mut self, participation: Participation) -> Self {
        self.participation = participation;
        self
    }

    pub fn kind(mut self, kind: ParamKind) -> Self {
        self.kind = kind;
        self
    }

    fn participates(&self, value: &FieldValue) -> bool {
        match self.participation {
            Participation::Always => true,
            Participation::WhenTruthy => value.is_truthy(),
        }
    }
}

/// What to do with a parameter a [`FilterSpec`] does not recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownFilterKey {
    /// Fail with `InvalidArgument("unsupported filter key: ...")`.
    #[default]
    Reject,
    /// Skip it silently (logged at debug level).
    Ignore,
}

/// An inclusive `min <= max` pair of parameters, checked by the search layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangePair {
    pub min_param: String,
    pub max_param: String,
}

/// The parameters an entity can be searched by.
#[derive(Debug, Clone, Default)]
pub struct FilterSpec {
    rules: Vec<FilterRule>,
    ranges: Vec<RangePair>,
    unknown: UnknownFilterKey,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(mut self, rule: FilterRule) -> Self {
        self.rules.retain(|r| r.param != rule.param);
        self.rules.push(rule);
        self
    }

    pub fn range(mut self, min_param: &str, max_param: &str) -> Self {
        self.ranges.push(RangePair {
            min_param: min_param.to_string(),
            max_param: max_param.to_string(),
        });
        self
    }

    pub fn unknown_keys(mut self, policy: UnknownFilterKey) -> Self {
        self.unknown = policy;
        self
    }

    pub fn unknown_key_policy(&self) -> UnknownFilterKey {
        self.unknown
    }

    pub fn rules(&self) -> &[FilterRule] {
        &self.rules
    }

    pub fn ranges(&self) -> &[RangePair] {
        &self.ranges
    }

    pub fn find(&self, param: &str) -> Option<&FilterRule> {
        self.rules.iter().find(|r| r.param == param)
    }

    /// Look up a parameter, applying the unknown-key policy.
    ///
    /// `Ok(None)` means the key is unknown and should be skipped.
    pub(crate) fn lookup(&self, param: &str) -> JoblyResult<Option<&FilterRule>> {
        match (self.find(param), self.unknown) {
            (Some(rule), _) => Ok(Some(rule)),
            (None, UnknownFilterKey::Reject) => Err(JoblyError::unsupported_filter_key(param)),
            (None, UnknownFilterKey::Ignore) => {
                tracing::debug!(target: "jobly.filter", param, "ignoring unrecognized filter key");
                Ok(None)
            }
        }
    }
}

/// Build a `WHERE` predicate for an entity's built-in filter spec.
pub fn build_where_fragment(params: &FieldMap, kind: EntityKind) -> JoblyResult<Fragment> {
    build_where_fragment_with(params, &kind.filter_spec())
}

/// Build a `WHERE` predicate (without the `WHERE` keyword) from `params`.
///
/// Keys are visited in iteration order. Each participating key emits
/// `<column> <op> $i`, where `i` counts participating keys only; clauses are
/// joined with ` AND `. An empty result means "no filter".
///
/// Values pass through the rule's [`ValueTransform`], so `Contains` rules bind
/// `%v%` for a plain `v`. Callers should not add the wildcards themselves; a
/// pre-wrapped `%v%` binds as `%%v%%`, which still matches the same rows under
/// `ILIKE`.
///
/// No cross-field validation is done here; see [`crate::search`].
pub fn build_where_fragment_with(params: &FieldMap, spec: &FilterSpec) -> JoblyResult<Fragment> {
    let mut b = FragmentBuilder::new();
    for (key, value) in params.iter() {
        let Some(rule) = spec.lookup(key)? else {
            continue;
        };
        if !rule.participates(value) {
            continue;
        }
        if !b.is_empty() {
            b.push(" AND ");
        }
        b.push_ident(&rule.column)
            .push(" ")
            .push(rule.comparison.as_sql())
            .push(" ")
            .push_bind(rule.transform.apply(value));
    }
    Ok(b.build())
}
