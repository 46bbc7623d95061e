use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        DesignError::node_not_found("x")
            .to_string()
            .contains("node not found:")
    );
    assert!(
        DesignError::invalid_query("x")
            .to_string()
            .contains("invalid node query:")
    );
    assert!(
        DesignError::layout_inconsistency("x")
            .to_string()
            .contains("layout inconsistency:")
    );
    assert!(
        DesignError::animation_target_missing("x")
            .to_string()
            .contains("animation target missing:")
    );
}

#[test]
fn format_errors_convert_and_keep_detail() {
    let err: DesignError = FormatError::UnsupportedVersion {
        expected: 3,
        found: 9,
    }
    .into();
    let msg = err.to_string();
    assert!(msg.starts_with("format error:"));
    assert!(msg.contains("9"));
    assert!(matches!(
        err,
        DesignError::Format(FormatError::UnsupportedVersion { found: 9, .. })
    ));
}

#[test]
fn only_layout_inconsistency_is_fatal() {
    assert!(!DesignError::layout_inconsistency("gap").is_recoverable());
    assert!(DesignError::node_not_found("#x").is_recoverable());
    assert!(
        DesignError::VariantMismatch {
            component_set: "Square".into(),
            variant: "a=b".into(),
        }
        .is_recoverable()
    );
    assert!(DesignError::from(FormatError::InvalidUtf8 { context: "name" }).is_recoverable());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = DesignError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
