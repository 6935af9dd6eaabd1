//! Reference entries and their classification
//!
//! A [`ReferenceEntry`] is the wire form of a named value request. It is
//! classified exactly once into a [`ResolvedSource`]; nothing downstream
//! looks at the raw optional fields again.

use serde::{Deserialize, Serialize};

use crate::document::DocumentStore;
use crate::error::{Error, Result};
use crate::path::PathExpression;
use crate::policy::{self, ResolutionPolicy};

/// Explicit type tag of a reference entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferenceType {
    Value,
    ValueRef,
    FieldRef,
}

/// A policy-aware path reference
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRef {
    /// Path to the value, optionally prefixed with `context[<key>].`
    #[serde(default)]
    pub path: String,

    /// Behaviour when the path has no value; unset means `Required`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<ResolutionPolicy>,

    /// Value used by the `Optional` policy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

/// A named request for one environment value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceEntry {
    pub key: String,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ReferenceType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_ref: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_ref: Option<FieldRef>,
}

impl ReferenceEntry {
    /// An entry with a literal value
    pub fn literal(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// An entry whose value must exist at `path`
    pub fn value_ref(key: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value_ref: Some(path.into()),
            ..Self::default()
        }
    }

    /// An entry resolved through a field reference
    pub fn field_ref(key: impl Into<String>, field_ref: FieldRef) -> Self {
        Self {
            key: key.into(),
            field_ref: Some(field_ref),
            ..Self::default()
        }
    }

    /// The type this entry resolves as: the explicit tag, or the first
    /// populated field among `value`, `valueRef`, `fieldRef`.
    pub fn effective_type(&self) -> Option<ReferenceType> {
        if self.kind.is_some() {
            return self.kind;
        }
        if non_empty(&self.value).is_some() {
            Some(ReferenceType::Value)
        } else if non_empty(&self.value_ref).is_some() {
            Some(ReferenceType::ValueRef)
        } else if self.field_ref.is_some() {
            Some(ReferenceType::FieldRef)
        } else {
            None
        }
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

/// A `FieldRef` after its path has been parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSelector {
    pub expr: PathExpression,
    pub policy: ResolutionPolicy,
    pub default_value: String,
}

impl FieldSelector {
    pub fn resolve(&self, docs: &dyn DocumentStore) -> Result<String> {
        policy::resolve(docs, &self.expr, self.policy, &self.default_value)
    }
}

impl TryFrom<&FieldRef> for FieldSelector {
    type Error = Error;

    fn try_from(field_ref: &FieldRef) -> Result<Self> {
        Ok(Self {
            expr: PathExpression::parse(&field_ref.path)?,
            policy: field_ref.policy.unwrap_or_default(),
            default_value: field_ref.default_value.clone().unwrap_or_default(),
        })
    }
}

/// Where a reference entry's value comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedSource {
    Literal(String),
    /// Sugar for a `Required` field path with no default
    ValuePath(PathExpression),
    FieldPath(FieldSelector),
}

impl ResolvedSource {
    /// Produce the value for this source.
    pub fn resolve(&self, docs: &dyn DocumentStore) -> Result<String> {
        match self {
            ResolvedSource::Literal(value) => Ok(value.clone()),
            ResolvedSource::ValuePath(expr) => {
                policy::resolve(docs, expr, ResolutionPolicy::Required, "")
            }
            ResolvedSource::FieldPath(selector) => selector.resolve(docs),
        }
    }

    /// Short label used in logs
    pub fn label(&self) -> &'static str {
        match self {
            ResolvedSource::Literal(_) => "value",
            ResolvedSource::ValuePath(_) => "valueRef",
            ResolvedSource::FieldPath(_) => "fieldRef",
        }
    }
}

/// Decide how `entry` is resolved.
///
/// An explicit type tag wins over inference. Without one, `value` wins over
/// `valueRef`, which wins over `fieldRef`. A tag whose field is empty, or an
/// entry with nothing populated, is an `UnresolvableReference`.
pub fn classify(entry: &ReferenceEntry) -> Result<ResolvedSource> {
    let Some(kind) = entry.effective_type() else {
        return Err(Error::unresolvable(
            &entry.key,
            "one of value, valueRef or fieldRef must be set",
        ));
    };

    match kind {
        ReferenceType::Value => non_empty(&entry.value)
            .map(|value| ResolvedSource::Literal(value.to_string()))
            .ok_or_else(|| Error::unresolvable(&entry.key, "type Value requires value")),
        ReferenceType::ValueRef => {
            let path = non_empty(&entry.value_ref)
                .ok_or_else(|| Error::unresolvable(&entry.key, "type ValueRef requires valueRef"))?;
            Ok(ResolvedSource::ValuePath(PathExpression::parse(path)?))
        }
        ReferenceType::FieldRef => {
            let field_ref = entry
                .field_ref
                .as_ref()
                .ok_or_else(|| Error::unresolvable(&entry.key, "type FieldRef requires fieldRef"))?;
            Ok(ResolvedSource::FieldPath(FieldSelector::try_from(field_ref)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_wins_over_field_ref() {
        let entry = ReferenceEntry {
            key: "A".into(),
            value: Some("one".into()),
            field_ref: Some(FieldRef {
                path: "spec.foo".into(),
                ..FieldRef::default()
            }),
            ..ReferenceEntry::default()
        };
        assert_eq!(
            classify(&entry).unwrap(),
            ResolvedSource::Literal("one".into())
        );
    }

    #[test]
    fn value_ref_wins_over_field_ref() {
        let entry = ReferenceEntry {
            key: "A".into(),
            value_ref: Some("spec.a".into()),
            field_ref: Some(FieldRef::default()),
            ..ReferenceEntry::default()
        };
        assert_eq!(
            classify(&entry).unwrap(),
            ResolvedSource::ValuePath(PathExpression::primary("spec.a"))
        );
    }

    #[test]
    fn empty_literal_falls_through_to_value_ref() {
        let entry = ReferenceEntry {
            key: "A".into(),
            value: Some(String::new()),
            value_ref: Some("spec.a".into()),
            ..ReferenceEntry::default()
        };
        assert_eq!(classify(&entry).unwrap().label(), "valueRef");
    }

    #[test]
    fn explicit_tag_wins_over_inference() {
        let entry = ReferenceEntry {
            key: "A".into(),
            kind: Some(ReferenceType::FieldRef),
            value: Some("one".into()),
            field_ref: Some(FieldRef {
                path: "spec.foo".into(),
                policy: Some(ResolutionPolicy::Optional),
                default_value: Some("d".into()),
            }),
            ..ReferenceEntry::default()
        };
        assert_eq!(
            classify(&entry).unwrap(),
            ResolvedSource::FieldPath(FieldSelector {
                expr: PathExpression::primary("spec.foo"),
                policy: ResolutionPolicy::Optional,
                default_value: "d".into(),
            })
        );
    }

    #[test]
    fn explicit_tag_with_empty_field_is_unresolvable() {
        let entry = ReferenceEntry {
            key: "A".into(),
            kind: Some(ReferenceType::ValueRef),
            value: Some("one".into()),
            ..ReferenceEntry::default()
        };
        let err = classify(&entry).unwrap_err();
        assert!(matches!(err, Error::UnresolvableReference { ref key, .. } if key == "A"));
    }

    #[test]
    fn value_tag_with_empty_value_is_unresolvable() {
        let entry = ReferenceEntry {
            key: "A".into(),
            kind: Some(ReferenceType::Value),
            value: Some(String::new()),
            value_ref: Some("spec.a".into()),
            ..ReferenceEntry::default()
        };
        let err = classify(&entry).unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot resolve reference A: type Value requires value"
        );
    }

    #[test]
    fn field_ref_tag_without_field_ref_is_unresolvable() {
        let entry = ReferenceEntry {
            key: "A".into(),
            kind: Some(ReferenceType::FieldRef),
            value: Some("one".into()),
            ..ReferenceEntry::default()
        };
        let err = classify(&entry).unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot resolve reference A: type FieldRef requires fieldRef"
        );
    }

    #[test]
    fn nothing_populated_is_unresolvable() {
        let err = classify(&ReferenceEntry {
            key: "EMPTY".into(),
            ..ReferenceEntry::default()
        })
        .unwrap_err();
        assert_eq!(err.reference_key(), Some("EMPTY"));
    }

    #[test]
    fn field_ref_with_empty_path_is_empty_path() {
        let entry = ReferenceEntry::field_ref("A", FieldRef::default());
        assert!(matches!(classify(&entry), Err(Error::EmptyPath)));
    }

    #[test]
    fn deserializes_wire_form() {
        let entry: ReferenceEntry = serde_json::from_value(serde_json::json!({
            "key": "X",
            "type": "FieldRef",
            "fieldRef": {"path": "spec.bad", "policy": "Optional", "defaultValue": "d"}
        }))
        .unwrap();
        assert_eq!(entry.kind, Some(ReferenceType::FieldRef));
        let field_ref = entry.field_ref.unwrap();
        assert_eq!(field_ref.policy, Some(ResolutionPolicy::Optional));
        assert_eq!(field_ref.default_value.as_deref(), Some("d"));
    }
}
