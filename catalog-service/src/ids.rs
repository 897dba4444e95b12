//! Typed request identifiers
//!
//! Every request handled by the service carries an `x-request-id` of the form
//! `req_<base32 uuidv7>`, e.g. `req_01h455vb4pex5vsknk084sn02q`. UUIDv7 keeps the
//! ids sortable by creation time, which makes log correlation straightforward.
//!
//! ```rust
//! use catalog_service::ids::RequestId;
//!
//! let id = RequestId::new();
//! assert!(id.as_str().starts_with("req_"));
//! ```

use http::Request;
use mti::prelude::*;
use std::fmt;
use std::str::FromStr;
use tower_http::request_id::{MakeRequestId, RequestId as TowerRequestId};

/// Request identifier with the `req` TypeID prefix
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(MagicTypeId);

impl RequestId {
    pub const PREFIX: &'static str = "req";

    #[must_use]
    pub fn new() -> Self {
        Self(Self::PREFIX.create_type_id::<V7>())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        self.0.prefix().as_str()
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RequestId {
    type Err = RequestIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mti = MagicTypeId::from_str(s).map_err(RequestIdError::Parse)?;

        if mti.prefix().as_str() != Self::PREFIX {
            return Err(RequestIdError::InvalidPrefix {
                expected: Self::PREFIX.to_string(),
                actual: mti.prefix().as_str().to_string(),
            });
        }

        Ok(Self(mti))
    }
}

impl AsRef<str> for RequestId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Error returned when parsing a [`RequestId`]
#[derive(Debug, thiserror::Error)]
pub enum RequestIdError {
    #[error("failed to parse request ID: {0}")]
    Parse(#[from] MagicTypeIdError),

    #[error("invalid prefix: expected '{expected}', got '{actual}'")]
    InvalidPrefix { expected: String, actual: String },
}

/// tower-http id generator producing [`RequestId`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeTypedRequestId;

impl MakeRequestId for MakeTypedRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<TowerRequestId> {
        let id = RequestId::new();
        let header_value = http::HeaderValue::from_str(id.as_str()).ok()?;
        Some(TowerRequestId::new(header_value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_format() {
        let id = RequestId::new();
        assert_eq!(id.prefix(), "req");
        // prefix (3) + underscore (1) + suffix (26)
        assert_eq!(id.as_str().len(), 30);
    }

    #[test]
    fn test_request_id_parse() {
        let id = RequestId::from_str("req_01h455vb4pex5vsknk084sn02q").unwrap();
        assert_eq!(id.to_string(), "req_01h455vb4pex5vsknk084sn02q");
    }

    #[test]
    fn test_request_id_rejects_other_prefix() {
        match RequestId::from_str("prod_01h455vb4pex5vsknk084sn02q") {
            Err(RequestIdError::InvalidPrefix { expected, actual }) => {
                assert_eq!(expected, "req");
                assert_eq!(actual, "prod");
            }
            other => panic!("expected InvalidPrefix, got {:?}", other),
        }
        assert!(RequestId::from_str("req_invalid").is_err());
    }

    #[test]
    fn test_make_typed_request_id() {
        let request = http::Request::builder().body(()).unwrap();
        let id = MakeTypedRequestId.make_request_id(&request).unwrap();
        let value = id.into_header_value();
        assert!(RequestId::from_str(value.to_str().unwrap()).is_ok());
    }
}
