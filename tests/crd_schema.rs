//! Checks on the generated NangoIntegration CRD

use kube::CustomResourceExt;
use nango_operator::crd::NangoIntegration;

#[test]
fn crd_identity() {
    let crd = NangoIntegration::crd();

    assert_eq!(crd.metadata.name.as_deref(), Some("nangointegrations.nango.nango.dev"));
    assert_eq!(crd.spec.group, "nango.nango.dev");
    assert_eq!(crd.spec.scope, "Namespaced");
    assert_eq!(crd.spec.names.kind, "NangoIntegration");
    assert_eq!(
        crd.spec.names.short_names.as_deref(),
        Some(&["ni".to_string()][..])
    );
}

#[test]
fn crd_has_status_subresource_and_columns() {
    let crd = NangoIntegration::crd();
    let version = &crd.spec.versions[0];

    assert_eq!(version.name, "v1alpha1");
    assert!(version
        .subresources
        .as_ref()
        .and_then(|s| s.status.as_ref())
        .is_some());

    let columns: Vec<_> = version
        .additional_printer_columns
        .as_ref()
        .unwrap()
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(columns, vec!["Unique Key", "Provider", "Status", "Ready", "Age"]);
}

#[test]
fn crd_schema_uses_manifest_field_names() {
    let crd = NangoIntegration::crd();
    let schema = serde_json::to_value(&crd.spec.versions[0].schema).unwrap();
    let spec = &schema["openAPIV3Schema"]["properties"]["spec"];

    for field in ["unique_key", "provider", "display_name", "credentials", "nango_token"] {
        assert!(
            spec["properties"][field].is_object(),
            "missing spec.{field} in schema"
        );
    }

    let credentials = &spec["properties"]["credentials"]["properties"];
    for field in ["type", "client_id", "client_secret", "scopes"] {
        assert!(
            credentials[field].is_object(),
            "missing spec.credentials.{field} in schema"
        );
    }
}
