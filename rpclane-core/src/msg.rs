use crate::error::{EnvelopeError, ErrorObject};
use crate::ids::CallId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outbound message: one method invocation with its correlation id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallEnvelope {
    pub id: CallId,
    pub method: String,
    pub params: Value,
}

impl CallEnvelope {
    pub fn new(id: CallId, method: impl Into<String>, params: Value) -> Self {
        CallEnvelope {
            id,
            method: method.into(),
            params,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(Value),
    Error(ErrorObject),
}

/// Inbound message carrying either a result or an error object.
///
/// The `id` echoed by the server is kept for diagnostics only and is never
/// compared with the id of the call that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    pub id: Option<Value>,
    pub outcome: Outcome,
}

impl ResponseEnvelope {
    pub fn success(value: Value) -> Self {
        ResponseEnvelope {
            id: None,
            outcome: Outcome::Success(value),
        }
    }

    pub fn error(error: ErrorObject) -> Self {
        ResponseEnvelope {
            id: None,
            outcome: Outcome::Error(error),
        }
    }

    /// Interpret a decoded JSON body.
    ///
    /// A `result` key, even one holding `null`, marks success. Anything
    /// without it is an error envelope, whatever its `error` member holds.
    pub fn from_value(value: Value) -> Result<Self, EnvelopeError> {
        let Value::Object(mut body) = value else {
            return Err(EnvelopeError::NotAnObject);
        };

        let id = body.remove("id");
        if let Some(result) = body.remove("result") {
            return Ok(ResponseEnvelope {
                id,
                outcome: Outcome::Success(result),
            });
        }

        let error = body.remove("error").ok_or(EnvelopeError::MissingOutcome)?;
        let error = ErrorObject::from_value(error);
        Ok(ResponseEnvelope {
            id,
            outcome: Outcome::Error(error),
        })
    }

    pub fn into_result(self) -> Result<Value, ErrorObject> {
        match self.outcome {
            Outcome::Success(value) => Ok(value),
            Outcome::Error(error) => Err(error),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, Outcome::Error(_))
    }
}
