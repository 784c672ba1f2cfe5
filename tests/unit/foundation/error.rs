use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        SpriterError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        SpriterError::precondition("x")
            .to_string()
            .contains("precondition violated:")
    );
    assert!(
        SpriterError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = SpriterError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
