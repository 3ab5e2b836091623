use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Map, Value};
use std::fmt;
use thiserror::Error;

/// Error codes the server side of the protocol is known to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Server-defined authorization failure. Carries no details.
    Unauthorized,
    /// Request failed validation; `details` lists the field violations.
    Validation,
    MethodNotFound,
}

impl ErrorCode {
    pub fn code(self) -> i64 {
        match self {
            ErrorCode::Unauthorized => -32000,
            ErrorCode::Validation => -32600,
            ErrorCode::MethodNotFound => -32601,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            -32000 => Some(ErrorCode::Unauthorized),
            -32600 => Some(ErrorCode::Validation),
            -32601 => Some(ErrorCode::MethodNotFound),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::Unauthorized => "unauthorized",
            ErrorCode::Validation => "validation_error",
            ErrorCode::MethodNotFound => "method_not_found",
        };
        write!(f, "{}", s)
    }
}

/// One segment of the path to an offending input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocSegment {
    Index(i64),
    Field(String),
}

impl fmt::Display for LocSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocSegment::Index(i) => write!(f, "{}", i),
            LocSegment::Field(name) => f.write_str(name),
        }
    }
}

impl From<&str> for LocSegment {
    fn from(value: &str) -> Self {
        LocSegment::Field(value.to_string())
    }
}

impl From<i64> for LocSegment {
    fn from(value: i64) -> Self {
        LocSegment::Index(value)
    }
}

/// A single field violation reported inside a validation error.
///
/// Keys other than the four known ones (e.g. `ctx`) are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldViolation {
    #[serde(rename = "type")]
    pub kind: String,
    pub msg: String,
    #[serde(default)]
    pub input: Value,
    #[serde(default)]
    pub loc: Vec<LocSegment>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FieldViolation {
    /// Dotted rendering of `loc`, e.g. `items.0.name`.
    pub fn path(&self) -> String {
        self.loc
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// The `error` member of a response envelope, kept exactly as the server sent it.
///
/// The member may hold any JSON value. `code`, `message` and `details` are
/// read out of it when they have the usual shape; the raw value is what
/// serializes back out.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorObject {
    raw: Value,
    code: Option<i64>,
    message: Option<String>,
    details: Option<Vec<FieldViolation>>,
}

impl ErrorObject {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        let message: String = message.into();
        Self::from_value(json!({"code": code, "message": message}))
    }

    pub fn with_details(code: i64, message: impl Into<String>, details: Vec<FieldViolation>) -> Self {
        let message: String = message.into();
        Self::from_value(json!({"code": code, "message": message, "details": details}))
    }

    /// Wrap whatever the server put in the `error` member.
    pub fn from_value(raw: Value) -> Self {
        let code = raw.get("code").and_then(Value::as_i64);
        let message = raw
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_owned);
        let details = raw
            .get("details")
            .and_then(|details| Vec::<FieldViolation>::deserialize(details).ok());

        ErrorObject {
            raw,
            code,
            message,
            details,
        }
    }

    /// Integer `code`, if the server sent one.
    pub fn code(&self) -> Option<i64> {
        self.code
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Parsed `details`, absent when missing or not a list of violations.
    pub fn details(&self) -> Option<&[FieldViolation]> {
        self.details.as_deref()
    }

    /// Field violations, empty when the server sent none.
    pub fn violations(&self) -> &[FieldViolation] {
        self.details().unwrap_or_default()
    }

    pub fn kind(&self) -> Option<ErrorCode> {
        self.code.and_then(ErrorCode::from_code)
    }

    pub fn is_validation(&self) -> bool {
        self.kind() == Some(ErrorCode::Validation)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind() == Some(ErrorCode::Unauthorized)
    }

    pub fn is_method_not_found(&self) -> bool {
        self.kind() == Some(ErrorCode::MethodNotFound)
    }

    /// The member exactly as received.
    pub fn as_value(&self) -> &Value {
        &self.raw
    }

    pub fn into_value(self) -> Value {
        self.raw
    }
}

impl Serialize for ErrorObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ErrorObject {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(ErrorObject::from_value)
    }
}

impl fmt::Display for ErrorObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.code, &self.message) {
            (Some(code), Some(message)) => write!(f, "RPC error {}: {}", code, message),
            (Some(code), None) => write!(f, "RPC error {}", code),
            _ => write!(f, "RPC error: {}", self.raw),
        }
    }
}

impl std::error::Error for ErrorObject {}

/// A response body that does not follow the envelope contract.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("response body is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("response body is not a JSON object")]
    NotAnObject,
    #[error("response carries neither `result` nor `error`")]
    MissingOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_parses_details() {
        let raw = json!({
            "code": -32600,
            "message": "Validation error",
            "details": [{
                "type": "greater_than",
                "msg": "Input should be greater than 0",
                "input": 0,
                "loc": ["page"]
            }]
        });

        let err: ErrorObject = serde_json::from_value(raw).unwrap();
        assert!(err.is_validation());
        assert_eq!(err.violations().len(), 1);

        let violation = &err.violations()[0];
        assert_eq!(violation.kind, "greater_than");
        assert_eq!(violation.input, json!(0));
        assert_eq!(violation.loc, vec![LocSegment::Field("page".to_string())]);
        assert!(violation.extra.is_empty());
    }

    #[test]
    fn test_unauthorized_has_no_details() {
        let err: ErrorObject =
            serde_json::from_value(json!({"code": -32000, "message": "unauthorized"})).unwrap();

        assert!(err.is_unauthorized());
        assert_eq!(
            err,
            ErrorObject::new(ErrorCode::Unauthorized.code(), "unauthorized")
        );
        assert!(err.details().is_none());
        assert!(err.violations().is_empty());

        // details stay absent on the way back out
        let out = serde_json::to_value(&err).unwrap();
        assert_eq!(out, json!({"code": -32000, "message": "unauthorized"}));
    }

    #[test]
    fn test_unknown_keys_survive() {
        let raw = json!({
            "code": -32600,
            "message": "Validation error",
            "trace_id": "abc",
            "details": [{
                "type": "greater_than",
                "msg": "Input should be greater than 0",
                "input": 0,
                "loc": ["page"],
                "ctx": {"gt": 0}
            }]
        });

        let err: ErrorObject = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(err.violations()[0].extra.get("ctx"), Some(&json!({"gt": 0})));
        assert_eq!(serde_json::to_value(&err).unwrap(), raw);
        assert_eq!(
            serde_json::to_value(&err.violations()[0]).unwrap(),
            raw["details"][0]
        );
    }

    #[test]
    fn test_error_without_message() {
        let err = ErrorObject::from_value(json!({"code": -1}));

        assert_eq!(err.code(), Some(-1));
        assert_eq!(err.message(), None);
        assert_eq!(err.kind(), None);
        assert_eq!(err.to_string(), "RPC error -1");
    }

    #[test]
    fn test_error_of_any_shape() {
        let err = ErrorObject::from_value(json!("boom"));

        assert_eq!(err.code(), None);
        assert_eq!(err.as_value(), &json!("boom"));
        assert_eq!(err.to_string(), r#"RPC error: "boom""#);

        // a string code is not an integer code, but it is still kept
        let err = ErrorObject::from_value(json!({"code": "E1", "message": "bad"}));
        assert_eq!(err.code(), None);
        assert_eq!(err.message(), Some("bad"));
        assert_eq!(err.into_value(), json!({"code": "E1", "message": "bad"}));
    }

    #[test]
    fn test_malformed_details_are_kept_raw() {
        let err = ErrorObject::from_value(json!({"code": -32600, "message": "x", "details": "nope"}));

        assert!(err.is_validation());
        assert!(err.details().is_none());
        assert_eq!(err.as_value()["details"], json!("nope"));
    }

    #[test]
    fn test_loc_mixes_fields_and_indices() {
        let violation: FieldViolation = serde_json::from_value(json!({
            "type": "missing",
            "msg": "Field required",
            "input": {},
            "loc": ["items", 2, "name"]
        }))
        .unwrap();

        assert_eq!(
            violation.loc,
            vec!["items".into(), LocSegment::Index(2), "name".into()]
        );
        assert_eq!(violation.path(), "items.2.name");
    }

    #[test]
    fn test_known_codes() {
        for code in [
            ErrorCode::Unauthorized,
            ErrorCode::Validation,
            ErrorCode::MethodNotFound,
        ] {
            assert_eq!(ErrorCode::from_code(code.code()), Some(code));
        }
        assert_eq!(ErrorCode::from_code(-1), None);
        assert_eq!(ErrorCode::Validation.to_string(), "validation_error");
    }

    #[test]
    fn test_method_not_found() {
        let err = ErrorObject::new(ErrorCode::MethodNotFound.code(), "Method not found");
        assert!(err.is_method_not_found());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_error_display() {
        let err = ErrorObject::new(-32000, "unauthorized");
        let display = format!("{}", err);
        assert!(display.contains("-32000"));
        assert!(display.contains("unauthorized"));
    }
}
