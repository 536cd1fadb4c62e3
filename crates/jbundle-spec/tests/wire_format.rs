//! Wire-format contract tests: decode, mutate and re-encode whole manifests
//! through the public API only.

use jbundle_spec::{
    DecodeError, DecodeOptions, Dependency, EncodeError, EncodeOptions, Manifest, Source,
    SourceKind, UnknownSourcePolicy,
};
use serde_json::{json, Value};

const GRAFANA_BUILDER: &str = r#"{"dependencies":[{"name":"grafana-builder","source":{"git":{"remote":"https://github.com/grafana/jsonnet-libs","subdir":"grafana-builder"}},"version":"54865853ebc1f901964e25a2e7a0e4d2cb6b9648","sum":"ELsYwK+kGdzX1mee2Yy+/b2mdO4Y503BOCDkFzwmGbE="}]}"#;

fn git_entry(name: &str, remote: &str, subdir: &str, version: &str, sum: &str) -> Value {
    json!({
        "name": name,
        "source": {"git": {"remote": remote, "subdir": subdir}},
        "version": version,
        "sum": sum
    })
}

fn decode_value(doc: &Value) -> Result<Manifest, DecodeError> {
    Manifest::decode(doc.to_string().as_bytes())
}

fn encode_value(m: &Manifest) -> Value {
    serde_json::from_slice(&m.encode().unwrap()).unwrap()
}

#[test]
fn grafana_builder_scenario() {
    let m = Manifest::decode(GRAFANA_BUILDER.as_bytes()).unwrap();
    assert_eq!(m.len(), 1);

    let dep = m.get("grafana-builder").expect("entry keyed by its name");
    let git = dep.source.as_git().expect("git source");
    assert_eq!(git.remote, "https://github.com/grafana/jsonnet-libs");
    assert_eq!(git.subdir, "grafana-builder");
    assert_eq!(dep.version, "54865853ebc1f901964e25a2e7a0e4d2cb6b9648");
    assert_eq!(dep.sum, "ELsYwK+kGdzX1mee2Yy+/b2mdO4Y503BOCDkFzwmGbE=");

    // compact output reproduces the input exactly
    let compact = m.encode_with(&EncodeOptions::compact()).unwrap();
    assert_eq!(String::from_utf8(compact).unwrap(), GRAFANA_BUILDER);
}

#[test]
fn round_trip_preserves_content_and_order() {
    let doc = json!({"dependencies": [
        git_entry("zeta", "https://example.com/zeta", "", "v1", "eg=="),
        git_entry("alpha", "https://example.com/alpha", "lib", "v2", "YQ=="),
        {"name": "mid", "source": {"local": {"directory": "vendor/mid"}}, "version": "", "sum": ""}
    ]});
    let m = decode_value(&doc).unwrap();
    assert_eq!(m.names().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);

    let again = Manifest::decode(&m.encode().unwrap()).unwrap();
    assert_eq!(again, m);
    assert_eq!(
        again.names().collect::<Vec<_>>(),
        m.names().collect::<Vec<_>>()
    );
    assert_eq!(encode_value(&again), doc);
}

#[test]
fn reordered_array_is_a_different_manifest() {
    let a = git_entry("a", "https://example.com/a", "", "v1", "YQ==");
    let b = git_entry("b", "https://example.com/b", "", "v1", "Yg==");
    let ab = decode_value(&json!({"dependencies": [a.clone(), b.clone()]})).unwrap();
    let ba = decode_value(&json!({"dependencies": [b, a]})).unwrap();

    assert_eq!(ba.names().collect::<Vec<_>>(), vec!["b", "a"]);
    assert_ne!(ab, ba, "same entries in another order must not compare equal");
}

#[test]
fn every_key_matches_its_dependency_name() {
    let doc = json!({"dependencies": [
        git_entry("one", "https://example.com/1", "", "v", "s"),
        git_entry("two", "https://example.com/2", "x", "v", "s")
    ]});
    let m = decode_value(&doc).unwrap();
    for (name, dep) in m.iter() {
        assert_eq!(name, dep.name);
    }
    // iteration is restartable
    assert_eq!(m.iter().count(), 2);
    assert_eq!(m.iter().count(), 2);
}

#[test]
fn repeated_encode_is_byte_identical() {
    let m = Manifest::decode(GRAFANA_BUILDER.as_bytes()).unwrap();
    let first = m.encode().unwrap();
    let second = m.encode().unwrap();
    assert_eq!(first, second);
    assert!(first.ends_with(b"}\n"));
}

#[test]
fn source_with_two_kinds_fails() {
    let doc = json!({"dependencies": [{
        "name": "both",
        "source": {
            "git": {"remote": "https://example.com/r", "subdir": ""},
            "local": {"directory": "r"}
        },
        "version": "v",
        "sum": "s"
    }]});
    let err = decode_value(&doc).unwrap_err();
    assert!(matches!(err, DecodeError::AmbiguousSource { .. }), "{err}");
}

#[test]
fn source_with_no_kind_fails() {
    let doc = json!({"dependencies": [
        {"name": "none", "source": {}, "version": "v", "sum": "s"}
    ]});
    let err = decode_value(&doc).unwrap_err();
    assert!(matches!(err, DecodeError::EmptySource { index: 0, .. }), "{err}");
}

#[test]
fn entry_missing_required_field_fails() {
    let doc = json!({"dependencies": [{
        "name": "no-sum",
        "source": {"git": {"remote": "https://example.com/r", "subdir": ""}},
        "version": "v"
    }]});
    let err = decode_value(&doc).unwrap_err();
    assert!(err.to_string().contains("sum"), "{err}");
}

#[test]
fn failed_decode_returns_nothing() {
    let doc = json!({"dependencies": [
        git_entry("good", "https://example.com/g", "", "v", "s"),
        {"name": "bad", "source": {"svn": {}}, "version": "v", "sum": "s"}
    ]});
    match decode_value(&doc) {
        Err(DecodeError::UnknownSource { index, name, key }) => {
            assert_eq!(index, 1);
            assert_eq!(name, "bad");
            assert_eq!(key, "svn");
        }
        other => panic!("expected unknown source error, got {other:?}"),
    }
}

#[test]
fn tolerant_reader_ignores_future_kinds() {
    let mut entry = git_entry("lib", "https://example.com/lib", "", "v", "s");
    entry["source"]["registry"] = json!({"name": "lib"});
    let doc = json!({"dependencies": [entry]}).to_string();

    let opts = DecodeOptions::default().with_unknown_sources(UnknownSourcePolicy::Skip);
    let m = Manifest::decode_with(doc.as_bytes(), &opts).unwrap();
    assert_eq!(m.get("lib").unwrap().source.kind(), SourceKind::Git);

    // the skipped key is not written back
    let out = encode_value(&m);
    assert!(out["dependencies"][0]["source"].get("registry").is_none());
}

#[test]
fn resolver_style_update_cycle() {
    let mut m = Manifest::decode(GRAFANA_BUILDER.as_bytes()).unwrap();
    m.insert(
        Dependency::git(
            "prometheus-mixin",
            "https://github.com/prometheus/prometheus",
            "documentation/prometheus-mixin",
        )
        .with_version("7c039a6b3b4b2a9d7c613ac8bd3fc16e8ca79684"),
    );

    // pin every entry the way a resolver would after fetching
    let names: Vec<String> = m.names().map(str::to_owned).collect();
    for name in &names {
        if let Some(dep) = m.get_mut(name) {
            if dep.sum.is_empty() {
                dep.sum = "bVGOsq3hLOw2irNPAS91a5dZJqQlBUNWy3pVwM4+kIY=".into();
            }
        }
    }

    let reloaded = Manifest::decode(&m.encode().unwrap()).unwrap();
    assert_eq!(
        reloaded.names().collect::<Vec<_>>(),
        vec!["grafana-builder", "prometheus-mixin"]
    );
    assert_eq!(
        reloaded.get("prometheus-mixin").unwrap().sum,
        "bVGOsq3hLOw2irNPAS91a5dZJqQlBUNWy3pVwM4+kIY="
    );
    assert_eq!(
        reloaded.get("grafana-builder").unwrap().source,
        Source::git("https://github.com/grafana/jsonnet-libs", "grafana-builder")
    );
}

#[test]
fn invalid_in_memory_state_is_not_written() {
    let mut m = Manifest::new();
    m.set("", Dependency::local("", "x"));
    assert!(matches!(m.encode(), Err(EncodeError::EmptyName)));

    let mut m = Manifest::new();
    m.set("alias", Dependency::local("x", "./x"));
    let err = m.encode().unwrap_err();
    assert_eq!(err.to_string(), "dependency stored under 'alias' is named 'x'");
}

#[test]
fn git_source_without_remote_is_accepted() {
    for source in [json!({"git": {}}), json!({"git": {"remote": "", "subdir": ""}})] {
        let doc = json!({"dependencies": [
            {"name": "x", "source": source, "version": "v", "sum": "s"}
        ]});
        let m = decode_value(&doc).unwrap();
        let git = m.get("x").unwrap().source.as_git().unwrap();
        assert!(git.remote.is_empty());
        assert!(git.subdir.is_empty());

        // empty fields are still written, so the entry survives a rewrite
        let out = encode_value(&m);
        assert_eq!(
            out["dependencies"][0]["source"],
            json!({"git": {"remote": "", "subdir": ""}})
        );
    }
}
