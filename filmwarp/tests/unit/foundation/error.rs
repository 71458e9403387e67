use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(FilmWarpError::parse("x").to_string().contains("parse error:"));
    assert!(FilmWarpError::io("x").to_string().contains("io error:"));
    assert!(
        FilmWarpError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        FilmWarpError::evaluation("x")
            .to_string()
            .contains("evaluation error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = FilmWarpError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn std_io_errors_map_to_io_variant() {
    let err: FilmWarpError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
    assert!(matches!(err, FilmWarpError::Io(ref m) if m.contains("gone")));
}

#[test]
fn expr_errors_map_to_parse_variant() {
    let err: FilmWarpError = crate::expression::error::ExprError::new(3, "unknown symbol 'q'").into();
    let msg = err.to_string();
    assert!(msg.starts_with("parse error:"));
    assert!(msg.contains("byte 3"));
}
