//! Unit tests for the NangoIntegration CRD types
//!
//! Covers manifest deserialization, the value-or-secret precedence rule and
//! `NangoIntegrationSpec::validate()`.

#[cfg(test)]
mod nango_integration_spec {
    use crate::crd::{
        IntegrationPhase, NangoCredentials, NangoIntegrationSpec, NangoIntegrationStatus,
        SecretKeyRef, SecretOrValue, ValueSource,
    };

    fn valid_spec() -> NangoIntegrationSpec {
        NangoIntegrationSpec {
            unique_key: "acme-slack".to_string(),
            provider: "slack".to_string(),
            display_name: "Acme Slack".to_string(),
            credentials: NangoCredentials {
                type_: "OAUTH2".to_string(),
                client_id: SecretOrValue::literal("abc"),
                client_secret: SecretOrValue::secret_ref("s1", "secret"),
                scopes: None,
            },
            nango_token: SecretOrValue::literal("token"),
            nango_base_url: None,
        }
    }

    #[test]
    fn test_deserialize_manifest_spec() {
        let yaml = r#"
unique_key: acme-slack
provider: slack
display_name: Acme Slack
credentials:
  type: OAUTH2
  client_id:
    value: abc
  client_secret:
    secretKeyRef:
      name: s1
      key: secret
  scopes: "chat:write,channels:read"
nango_token:
  secretKeyRef:
    name: nango
    key: token
nango_base_url: https://nango.internal.example.com
"#;
        let spec: NangoIntegrationSpec = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(spec.unique_key, "acme-slack");
        assert_eq!(spec.credentials.type_, "OAUTH2");
        assert_eq!(
            spec.credentials.client_id.source(),
            ValueSource::Literal("abc")
        );
        assert_eq!(
            spec.credentials.client_secret.secret_key_ref,
            Some(SecretKeyRef {
                name: "s1".to_string(),
                key: "secret".to_string(),
            })
        );
        assert_eq!(
            spec.credentials.scopes.as_deref(),
            Some("chat:write,channels:read")
        );
        assert_eq!(
            spec.base_url_or("https://api.nango.dev"),
            "https://nango.internal.example.com"
        );
    }

    #[test]
    fn test_missing_token_defaults_to_unspecified() {
        let yaml = r#"
unique_key: acme-github
provider: github
display_name: Acme GitHub
credentials:
  type: OAUTH2
  client_id: { value: id }
  client_secret: { value: secret }
"#;
        let spec: NangoIntegrationSpec = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(spec.nango_token.source(), ValueSource::Unspecified);
        assert_eq!(spec.base_url_or("https://api.nango.dev"), "https://api.nango.dev");
    }

    #[test]
    fn test_literal_wins_over_secret_ref() {
        let both = SecretOrValue {
            value: Some("inline".to_string()),
            secret_key_ref: Some(SecretKeyRef {
                name: "s1".to_string(),
                key: "k".to_string(),
            }),
        };
        assert_eq!(both.source(), ValueSource::Literal("inline"));
    }

    #[test]
    fn test_empty_literal_falls_through_to_secret_ref() {
        let source = SecretOrValue {
            value: Some(String::new()),
            secret_key_ref: Some(SecretKeyRef {
                name: "s1".to_string(),
                key: "k".to_string(),
            }),
        };
        assert!(matches!(source.source(), ValueSource::SecretRef(r) if r.name == "s1"));

        let nothing = SecretOrValue {
            value: Some(String::new()),
            secret_key_ref: None,
        };
        assert_eq!(nothing.source(), ValueSource::Unspecified);
    }

    #[test]
    fn test_valid_spec_passes_validation() {
        assert!(valid_spec().validate().is_ok());
    }

    #[test]
    fn test_validation_reports_every_empty_field() {
        let mut spec = valid_spec();
        spec.unique_key = "  ".to_string();
        spec.provider = String::new();
        spec.credentials.type_ = String::new();

        let errors = spec.validate().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["spec.unique_key", "spec.provider", "spec.credentials.type"]
        );
    }

    #[test]
    fn test_blank_base_url_uses_default() {
        let mut spec = valid_spec();
        spec.nango_base_url = Some("   ".to_string());
        assert_eq!(spec.base_url_or("https://api.nango.dev"), "https://api.nango.dev");
    }

    #[test]
    fn test_status_wire_format() {
        let status = NangoIntegrationStatus {
            integration_id: "acme-slack".to_string(),
            status: Some(IntegrationPhase::Failed),
            error_message: "boom".to_string(),
            last_updated: Some("2025-01-01T00:00:00+00:00".to_string()),
            conditions: vec![crate::controller::status::ready_condition(
                IntegrationPhase::Failed,
                "boom",
                chrono::Utc::now(),
            )],
        };
        let json = serde_json::to_value(&status).unwrap();

        assert_eq!(json["integration_id"], "acme-slack");
        assert_eq!(json["status"], "Failed");
        assert_eq!(json["error_message"], "boom");
        assert_eq!(json["conditions"][0]["type"], "Ready");
        assert_eq!(json["conditions"][0]["status"], "False");
        assert!(json["conditions"][0]["lastTransitionTime"].is_string());
    }
}
