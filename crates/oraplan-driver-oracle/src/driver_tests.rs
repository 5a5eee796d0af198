//! Unit tests for the Oracle driver

use super::*;
use oraplan_core::ConnectionFieldType;
use pretty_assertions::assert_eq;

#[test]
fn test_oracle_driver_name() {
    assert_eq!(OracleDriver::new().name(), "oracle");
}

#[test]
fn test_easy_connect_string() {
    let driver = OracleDriver::new();
    let config = ConnectionConfig::new("db.internal", 1522, "FREEPDB1");
    assert_eq!(driver.build_connection_string(&config), "//db.internal:1522/FREEPDB1");

    let config = ConnectionConfig::new(" localhost ", 1521, " ORCL ");
    assert_eq!(driver.build_connection_string(&config), "//localhost:1521/ORCL");
}

#[test]
fn test_connection_field_schema() {
    let schema = OracleDriver::new().connection_field_schema();
    assert_eq!(schema.title.as_ref(), "Oracle Connection");

    let fields: Vec<(&str, Option<&str>)> = schema
        .fields
        .iter()
        .map(|f| (f.id.as_ref(), f.default_value.as_deref()))
        .collect();
    assert_eq!(
        fields,
        vec![
            ("host", Some("localhost")),
            ("port", Some("1521")),
            ("service_name", Some("ORCL")),
            ("user", Some("system")),
            ("password", None),
        ]
    );

    let password = &schema.fields[4];
    assert_eq!(password.field_type, ConnectionFieldType::Password);
    assert!(password.is_secret());
    assert!(schema.fields[..4].iter().all(|f| !f.is_secret()));
}

#[test]
fn test_schema_defaults_build_a_valid_descriptor() {
    let schema = OracleDriver::new().connection_field_schema();
    let mut config = ConnectionConfig::default();
    for field in &schema.fields {
        if let Some(value) = &field.default_value {
            config.set_field(&field.id, value).unwrap();
        }
    }
    assert!(config.validate().is_ok());
    assert_eq!(config.port, 1521);
    assert_eq!(config.username.as_deref(), Some("system"));
}

#[tokio::test]
async fn test_connect_rejects_invalid_descriptor() {
    let driver = OracleDriver::new();
    let config = ConnectionConfig::new("", 1521, "ORCL");
    let Err(err) = driver.connect(&config).await else {
        panic!("an empty host must be rejected");
    };
    assert!(matches!(err, OraplanError::Configuration(_)));
}

#[test]
fn test_column_type_classes() {
    assert!(is_integer_type(&OracleType::Number(10, 0)));
    assert!(is_integer_type(&OracleType::Int64));
    assert!(!is_integer_type(&OracleType::Number(0, -127)));
    assert!(is_numeric_type(&OracleType::Number(0, -127)));
    assert!(is_numeric_type(&OracleType::BinaryDouble));
    assert!(!is_numeric_type(&OracleType::Varchar2(30)));
}

#[test]
fn test_bind_values_keep_order() {
    let binds = bind_values(&[Value::from("abc"), Value::Null, Value::Int64(3)]);
    assert_eq!(binds.len(), 3);
    assert_eq!(bind_refs(&binds).len(), 3);
}
