//! # Merge / Projection Engine
//!
//! A [`Projection`] is a declarative table that turns the fragments of one
//! composite operation into a flat [`CompositeResponse`]. Each row, a
//! [`FieldMapping`], names one target field, one source backend, the path of
//! the value inside that backend's fragment, an optional [`Coercion`] and a
//! [`Presence`] policy for when the value is absent.
//!
//! ## Architecture Note
//!
//! Projection is a pure function of its input: no I/O and no shared state.
//! The same fragments always produce the same response, field for field and
//! in table order, so the serialized output is byte-identical between calls.
//!
//! Two backends may use the same field name for different things (both the
//! recipe and nutrition services answer with `calories`). The table keeps
//! those apart by giving each its own target name; targets must be unique.
//!
//! A table may also [carry the rest](Projection::carry_rest_of) of one
//! fragment: fields no row mentions are copied through unchanged after the
//! mapped ones. Write responses use this so nothing the backend answered is
//! dropped.
//!
//! A JSON `null` counts as absent. A value that is present but of the wrong
//! type is never defaulted: it fails the projection as `invalid_response`.

use crate::call::BackendId;
use crate::error::CompositeError;
use crate::fanout::Fragments;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

// =============================================================================
// Field paths
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(&'static str),
    Index(usize),
}

/// Location of a value inside a fragment, e.g. `[0][0].week_plan_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    /// The fragment itself.
    pub fn root() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn key(mut self, key: &'static str) -> Self {
        self.0.push(PathSegment::Key(key));
        self
    }

    #[must_use]
    pub fn index(mut self, index: usize) -> Self {
        self.0.push(PathSegment::Index(index));
        self
    }

    fn top_key(&self) -> Option<&'static str> {
        match self.0.first() {
            Some(PathSegment::Key(key)) => Some(*key),
            _ => None,
        }
    }

    fn resolve<'a>(&self, fragment: &'a Value) -> Option<&'a Value> {
        self.0.iter().try_fold(fragment, |value, segment| match segment {
            PathSegment::Key(key) => value.get(*key),
            PathSegment::Index(index) => value.get(*index),
        })
    }
}

impl From<&'static str> for FieldPath {
    fn from(key: &'static str) -> Self {
        Self::root().key(key)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        for (position, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if position == 0 => write!(f, "{key}")?,
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

// =============================================================================
// Coercion and presence
// =============================================================================

/// Conversion applied to a source value before it lands in the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Coercion {
    /// Copied unchanged.
    #[default]
    AsIs,
    /// A JSON integer. Floats without a fractional part are accepted.
    Integer,
    /// Any JSON number, emitted as a float.
    Number,
    /// Must already be a string.
    Text,
    /// Strings pass through; anything else is rendered as compact JSON text.
    Describe,
}

impl Coercion {
    fn apply(self, value: &Value) -> Result<Value, String> {
        match self {
            Coercion::AsIs => Ok(value.clone()),
            Coercion::Integer => {
                if value.is_i64() || value.is_u64() {
                    return Ok(value.clone());
                }
                match value.as_f64() {
                    Some(f) if f.fract() == 0.0 && I64_RANGE.contains(&f) => Ok(Value::from(f as i64)),
                    Some(f) if f.fract() == 0.0 => Err(format!("{f} does not fit a 64-bit integer")),
                    _ => Err(format!("expected an integer, found {}", describe_type(value))),
                }
            }
            Coercion::Number => value
                .as_f64()
                .map(Value::from)
                .ok_or_else(|| format!("expected a number, found {}", describe_type(value))),
            Coercion::Text => match value {
                Value::String(_) => Ok(value.clone()),
                other => Err(format!("expected a string, found {}", describe_type(other))),
            },
            Coercion::Describe => match value {
                Value::String(_) => Ok(value.clone()),
                other => Ok(Value::String(other.to_string())),
            },
        }
    }
}

/// Floats in this range convert to `i64` without saturating.
const I64_RANGE: std::ops::Range<f64> = i64::MIN as f64..i64::MAX as f64;

fn describe_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// What to do when the source value is absent or `null`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Presence {
    /// Absence fails the projection.
    #[default]
    Required,
    /// Absence yields this value.
    OrDefault(Value),
    /// Absence leaves the target field out of the response.
    Omit,
}

// =============================================================================
// Mapping table
// =============================================================================

/// One row of a projection table.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMapping {
    pub target: &'static str,
    pub source: BackendId,
    pub path: FieldPath,
    pub coercion: Coercion,
    pub presence: Presence,
}

impl FieldMapping {
    pub fn new(target: &'static str, source: BackendId, path: impl Into<FieldPath>) -> Self {
        Self {
            target,
            source,
            path: path.into(),
            coercion: Coercion::AsIs,
            presence: Presence::Required,
        }
    }

    #[must_use]
    pub fn coerce(mut self, coercion: Coercion) -> Self {
        self.coercion = coercion;
        self
    }

    #[must_use]
    pub fn or_default(mut self, default: Value) -> Self {
        self.presence = Presence::OrDefault(default);
        self
    }

    #[must_use]
    pub fn optional(mut self) -> Self {
        self.presence = Presence::Omit;
        self
    }

    fn project(&self, fragment: &Value) -> Result<Option<Value>, String> {
        match self.path.resolve(fragment).filter(|value| !value.is_null()) {
            Some(value) => self
                .coercion
                .apply(value)
                .map(Some)
                .map_err(|reason| format!("`{}`: {reason}", self.path)),
            None => match &self.presence {
                Presence::Required => Err(format!("`{}` is missing", self.path)),
                Presence::OrDefault(default) => Ok(Some(default.clone())),
                Presence::Omit => Ok(None),
            },
        }
    }
}

/// The declarative mapping of one composite operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    name: &'static str,
    fields: Vec<FieldMapping>,
    rest_from: Option<BackendId>,
}

impl Projection {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
            rest_from: None,
        }
    }

    #[must_use]
    pub fn field(mut self, mapping: FieldMapping) -> Self {
        debug_assert!(
            self.fields.iter().all(|existing| existing.target != mapping.target),
            "target field `{}` mapped twice in `{}`",
            mapping.target,
            self.name
        );
        self.fields.push(mapping);
        self
    }

    /// After the mapped fields, copies every other top-level field of
    /// `source`'s fragment unchanged, in fragment order. Fields a mapping
    /// already read or wrote are not copied again.
    #[must_use]
    pub fn carry_rest_of(mut self, source: BackendId) -> Self {
        self.rest_from = Some(source);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fields(&self) -> &[FieldMapping] {
        &self.fields
    }

    /// Backends this projection draws from.
    pub fn sources(&self) -> BTreeSet<BackendId> {
        self.fields
            .iter()
            .map(|mapping| mapping.source)
            .chain(self.rest_from)
            .collect()
    }

    /// Builds the composite response from `fragments`.
    pub fn project(&self, fragments: &Fragments) -> Result<CompositeResponse, CompositeError> {
        let mut out = Map::with_capacity(self.fields.len());
        for mapping in &self.fields {
            let error = |reason: String| CompositeError::Projection {
                backend: mapping.source,
                target: mapping.target.to_string(),
                reason,
            };
            let fragment = fragments
                .get(&mapping.source)
                .ok_or_else(|| error("no fragment was collected from this backend".to_string()))?;
            if let Some(value) = mapping.project(fragment).map_err(error)? {
                out.insert(mapping.target.to_string(), value);
            }
        }
        if let Some(source) = self.rest_from {
            self.carry_rest(source, fragments, &mut out)?;
        }
        debug!(projection = self.name, fields = out.len(), "Projected composite response");
        Ok(CompositeResponse(out))
    }
}

impl Projection {
    fn carry_rest(
        &self,
        source: BackendId,
        fragments: &Fragments,
        out: &mut Map<String, Value>,
    ) -> Result<(), CompositeError> {
        let error = |reason: &str| CompositeError::Projection {
            backend: source,
            target: "*".to_string(),
            reason: reason.to_string(),
        };
        let object = fragments
            .get(&source)
            .ok_or_else(|| error("no fragment was collected from this backend"))?
            .as_object()
            .ok_or_else(|| error("fragment is not an object"))?;

        let mapped: BTreeSet<&str> = self
            .fields
            .iter()
            .filter(|mapping| mapping.source == source)
            .filter_map(|mapping| mapping.path.top_key())
            .collect();
        for (key, value) in object {
            if !mapped.contains(key.as_str()) && !out.contains_key(key) {
                out.insert(key.clone(), value.clone());
            }
        }
        Ok(())
    }
}

// =============================================================================
// Composite response
// =============================================================================

/// A flat JSON object whose fields follow projection-table order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompositeResponse(Map<String, Value>);

impl CompositeResponse {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<CompositeResponse> for Value {
    fn from(response: CompositeResponse) -> Self {
        Value::Object(response.0)
    }
}
