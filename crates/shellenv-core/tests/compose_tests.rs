//! End-to-end composition tests

use std::collections::BTreeMap;

use pretty_assertions::assert_eq;
use serde_json::json;
use shellenv_core::{
    BulkReference, ConfigMapRef, CredentialRef, Documents, EnvVarsRef, Error, FieldRef, LazyStore,
    MemoryStore, ReferenceEntry, ResolutionPolicy, SecretRef, StoreKind, Stores, compose,
};

fn docs() -> Documents {
    Documents::new(json!({"spec": {"foo": "bar"}}))
}

fn store() -> MemoryStore {
    MemoryStore::new()
        .with_secret(
            "shell-vars",
            "crossplane-system",
            [("env", br#"{"A": "from-secret", "TOKEN": "t0k3n"}"#.to_vec())],
        )
        .with_config_map("settings", "crossplane-system", [("REGION", "eu-west-1")])
        .with_credential("foo-creds", [("password", b"secret".to_vec())])
        .with_env("SHELL_VARS", r#"{"A": "from-env", "LEVEL": "debug"}"#)
}

fn secret_ref() -> BulkReference {
    BulkReference::Secret(SecretRef {
        name: "shell-vars".into(),
        namespace: "crossplane-system".into(),
        key: "env".into(),
        keys: vec![],
    })
}

fn env_ref() -> BulkReference {
    BulkReference::Environment(EnvVarsRef {
        name: "SHELL_VARS".into(),
        keys: vec!["A".into(), "LEVEL".into()],
    })
}

fn required(key: &str, path: &str) -> ReferenceEntry {
    ReferenceEntry::field_ref(
        key,
        FieldRef {
            path: path.into(),
            policy: Some(ResolutionPolicy::Required),
            default_value: None,
        },
    )
}

#[test]
fn test_required_field_ref() {
    let store = store();
    let stores = Stores::from_backend(&store);
    let env = compose(&[required("X", "spec.foo")], &[], &docs(), &stores).unwrap();
    assert_eq!(env.get("X"), Some("bar"));
}

#[test]
fn test_optional_field_ref_default() {
    let store = store();
    let entry = ReferenceEntry::field_ref(
        "X",
        FieldRef {
            path: "spec.bad".into(),
            policy: Some(ResolutionPolicy::Optional),
            default_value: Some("d".into()),
        },
    );
    let env = compose(&[entry], &[], &docs(), &Stores::from_backend(&store)).unwrap();
    assert_eq!(env.get("X"), Some("d"));
}

#[test]
fn test_required_missing_aborts_composition() {
    let store = store();
    let err = compose(
        &[ReferenceEntry::literal("A", "one"), required("X", "spec.bad")],
        &[secret_ref()],
        &docs(),
        &Stores::from_backend(&store),
    )
    .unwrap_err();

    assert_eq!(err.reference_key(), Some("X"));
    assert!(matches!(err.root(), Error::PathNotFound { path, .. } if path == "spec.bad"));
    assert_eq!(
        err.to_string(),
        "cannot process reference X: cannot get observed composite value at spec.bad: no such field"
    );
}

#[test]
fn test_bulk_reference_overrides_entry() {
    let store = MemoryStore::new().with_credential("bundle", [("A", b"two".to_vec())]);
    let env = compose(
        &[ReferenceEntry::literal("A", "one")],
        &[BulkReference::Credential(CredentialRef {
            name: "bundle".into(),
            keys: vec!["A".into()],
        })],
        &docs(),
        &Stores::from_backend(&store),
    )
    .unwrap();
    assert_eq!(env.get("A"), Some("two"));
}

#[test]
fn test_later_bulk_reference_wins() {
    let store = store();
    let env = compose(
        &[ReferenceEntry::literal("A", "entry")],
        &[env_ref(), secret_ref()],
        &docs(),
        &Stores::from_backend(&store),
    )
    .unwrap();

    let expected: BTreeMap<String, String> = [
        ("A", "from-secret"),
        ("LEVEL", "debug"),
        ("TOKEN", "t0k3n"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    assert_eq!(env.into_inner(), expected);
}

#[test]
fn test_all_store_kinds_merge() {
    let store = store();
    let env = compose(
        &[required("FOO", "spec.foo")],
        &[
            env_ref(),
            BulkReference::ConfigMap(ConfigMapRef {
                name: "settings".into(),
                namespace: "crossplane-system".into(),
                keys: vec!["REGION".into()],
            }),
            secret_ref(),
            BulkReference::Credential(CredentialRef {
                name: "foo-creds".into(),
                keys: vec!["password".into(), "username".into()],
            }),
        ],
        &docs(),
        &Stores::from_backend(&store),
    )
    .unwrap();

    assert_eq!(env.get("FOO"), Some("bar"));
    assert_eq!(env.get("REGION"), Some("eu-west-1"));
    assert_eq!(env.get("password"), Some("secret"));
    assert_eq!(env.get("username"), Some(""));
    assert_eq!(env.get("TOKEN"), Some("t0k3n"));
}

#[test]
fn test_missing_secret_names_bulk_reference() {
    let store = MemoryStore::new();
    let err = compose(&[], &[secret_ref()], &docs(), &Stores::from_backend(&store)).unwrap_err();
    assert!(matches!(
        err.root(),
        Error::StoreNotFound { store: StoreKind::Secret, .. }
    ));
    assert_eq!(
        err.to_string(),
        "cannot process secret crossplane-system/shell-vars: \
         secret crossplane-system/shell-vars not found"
    );
}

#[test]
fn test_unresolvable_entry_is_reported() {
    let store = store();
    let entry = ReferenceEntry {
        key: "EMPTY".into(),
        ..ReferenceEntry::default()
    };
    let err = compose(&[entry], &[], &docs(), &Stores::from_backend(&store)).unwrap_err();
    assert!(matches!(err.root(), Error::UnresolvableReference { key, .. } if key == "EMPTY"));
}

#[test]
fn test_environment_source_can_be_replaced() {
    let backend = store();
    let other_env = MemoryStore::new().with_env("SHELL_VARS", r#"{"A": "override"}"#);
    let stores = Stores::from_backend(&backend).with_environment(&other_env);
    let env = compose(&[], &[env_ref()], &docs(), &stores).unwrap();
    assert_eq!(env.get("A"), Some("override"));
    assert_eq!(env.get("LEVEL"), Some(""));
}

#[test]
fn test_exports_render_composed_environment() {
    let store = store();
    let env = compose(
        &[
            required("FOO", "spec.foo"),
            ReferenceEntry::literal("GREETING", "say \"hi\""),
        ],
        &[],
        &docs(),
        &Stores::from_backend(&store),
    )
    .unwrap();
    assert_eq!(
        env.to_exports().unwrap(),
        r#"export FOO="bar";export GREETING="say \"hi\"";"#
    );
}

#[test]
fn test_secret_key_that_is_not_an_identifier_is_rejected() {
    let store = MemoryStore::new().with_secret(
        "shell-vars",
        "crossplane-system",
        [("env", br#"{"OK": "1", "X;touch /tmp/pwned;Y": "2"}"#.to_vec())],
    );
    let err = compose(&[], &[secret_ref()], &docs(), &Stores::from_backend(&store)).unwrap_err();
    assert!(matches!(
        err.root(),
        Error::InvalidVariableName { name } if name == "X;touch /tmp/pwned;Y"
    ));
    assert!(
        err.to_string()
            .starts_with("cannot process secret crossplane-system/shell-vars: ")
    );
}

#[test]
fn test_hyphenated_config_map_key_is_rejected() {
    let store = MemoryStore::new().with_config_map(
        "settings",
        "crossplane-system",
        [("MY-VAR", "x")],
    );
    let bulk = BulkReference::ConfigMap(ConfigMapRef {
        name: "settings".into(),
        namespace: "crossplane-system".into(),
        keys: vec![],
    });
    let err = compose(&[], &[bulk], &docs(), &Stores::from_backend(&store)).unwrap_err();
    assert!(matches!(err.root(), Error::InvalidVariableName { name } if name == "MY-VAR"));
}

#[test]
fn test_unavailable_store_names_bulk_reference() {
    let lazy: LazyStore<MemoryStore> =
        LazyStore::new(|| Err(Error::unavailable(StoreKind::Secret, "connection refused")));
    let fallback = MemoryStore::new();
    let stores = Stores::new(&lazy, &fallback, &fallback, &fallback);

    let err = compose(&[], &[secret_ref()], &docs(), &stores).unwrap_err();
    assert!(matches!(
        err.root(),
        Error::StoreUnavailable { store: StoreKind::Secret, .. }
    ));
    assert_eq!(
        err.to_string(),
        "cannot process secret crossplane-system/shell-vars: \
         secret store unavailable: connection refused"
    );
    assert!(!lazy.is_connected());
}
