//! Cursor model and signed codec
//!
//! A cursor records where the previous page ended: the sort value and the
//! unique id of its last row, the comparison to continue with, and the token
//! that produced the previous page. It leaves the service as a signed JWT so
//! clients can neither read positions as plain integers nor forge them.

use crate::core::error::PaginationError;
use crate::core::field::FieldValue;
use crate::core::predicate::{Operator, SortDirection};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upper bound on accepted token length
const MAX_CURSOR_TOKEN_LEN: usize = 8 * 1024;

/// Comparison a cursor continues with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CursorOperator {
    Ge,
    Gt,
    Le,
    Lt,
}

impl CursorOperator {
    /// Order in which rows are read when seeking with this operator
    pub fn direction(self) -> SortDirection {
        match self {
            CursorOperator::Ge | CursorOperator::Gt => SortDirection::Ascending,
            CursorOperator::Le | CursorOperator::Lt => SortDirection::Descending,
        }
    }

    /// Whether rows sharing the cursor's sort value may still follow
    pub fn admits_ties(self) -> bool {
        matches!(self, CursorOperator::Ge | CursorOperator::Le)
    }

    /// Strict comparison that selects rows beyond the cursor value
    pub fn strict(self) -> Operator {
        match self {
            CursorOperator::Ge | CursorOperator::Gt => Operator::Gt,
            CursorOperator::Le | CursorOperator::Lt => Operator::Lt,
        }
    }

    /// Operator used by the cursor of the page after this one
    pub fn continuation(self) -> Self {
        match self.direction() {
            SortDirection::Ascending => CursorOperator::Ge,
            SortDirection::Descending => CursorOperator::Le,
        }
    }
}

/// Value domain of a sort field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortFieldType {
    #[serde(rename = "int")]
    Int,
    #[serde(rename = "str")]
    Str,
}

impl SortFieldType {
    pub fn as_str(self) -> &'static str {
        match self {
            SortFieldType::Int => "int",
            SortFieldType::Str => "str",
        }
    }
}

impl fmt::Display for SortFieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortFieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "int" => Ok(SortFieldType::Int),
            "str" => Ok(SortFieldType::Str),
            other => Err(other.to_string()),
        }
    }
}

/// Which attribute a collection is ordered by
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortField {
    pub key: String,
    pub field_type: SortFieldType,
}

impl SortField {
    pub fn new(key: impl Into<String>, field_type: SortFieldType) -> Self {
        Self {
            key: key.into(),
            field_type,
        }
    }

    /// Parse a declared sort type, failing for types without a comparator
    pub fn parse(key: impl Into<String>, field_type: &str) -> Result<Self, PaginationError> {
        let key = key.into();
        let field_type = field_type
            .parse()
            .map_err(|sort_type| PaginationError::UnsupportedSortType {
                field: key.clone(),
                sort_type,
            })?;
        Ok(Self { key, field_type })
    }

    /// Read this field's value off a row
    pub fn value_of(&self, value: Option<FieldValue>) -> Result<SortValue, PaginationError> {
        value
            .and_then(|value| SortValue::from_field_value(self.field_type, value))
            .ok_or_else(|| PaginationError::UnsupportedSortType {
                field: self.key.clone(),
                sort_type: self.field_type.to_string(),
            })
    }
}

/// A sort position, tagged with its value domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortValue {
    Int(i64),
    Str(String),
}

impl SortValue {
    pub fn field_type(&self) -> SortFieldType {
        match self {
            SortValue::Int(_) => SortFieldType::Int,
            SortValue::Str(_) => SortFieldType::Str,
        }
    }

    /// Storage value compared against, numerically for `Int` and
    /// lexicographically for `Str`
    pub fn to_field_value(&self) -> FieldValue {
        match self {
            SortValue::Int(value) => FieldValue::Integer(*value),
            SortValue::Str(value) => FieldValue::String(value.clone()),
        }
    }

    pub fn from_field_value(field_type: SortFieldType, value: FieldValue) -> Option<Self> {
        match (field_type, value) {
            (SortFieldType::Int, FieldValue::Integer(value)) => Some(SortValue::Int(value)),
            (SortFieldType::Str, FieldValue::String(value)) => Some(SortValue::Str(value)),
            _ => None,
        }
    }

    fn to_json(&self) -> serde_json::Value {
        match self {
            SortValue::Int(value) => serde_json::Value::from(*value),
            SortValue::Str(value) => serde_json::Value::from(value.as_str()),
        }
    }

    fn from_json(field_type: SortFieldType, value: serde_json::Value) -> Option<Self> {
        match (field_type, value) {
            (SortFieldType::Int, serde_json::Value::Number(n)) => n.as_i64().map(SortValue::Int),
            (SortFieldType::Str, serde_json::Value::String(s)) => Some(SortValue::Str(s)),
            _ => None,
        }
    }
}

/// Decoded pagination cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    /// Token of the cursor that produced the page this cursor follows
    pub previous_cursor: Option<String>,
    pub sort_field_key: String,
    pub operator: CursorOperator,
    /// Sort value of the last row of the previous page
    pub value: SortValue,
    /// Unique id of the last row of the previous page
    pub tie_break_id: i64,
}

impl Cursor {
    pub fn sort_field_type(&self) -> SortFieldType {
        self.value.field_type()
    }

    pub fn sort_field(&self) -> SortField {
        SortField::new(self.sort_field_key.clone(), self.sort_field_type())
    }
}

/// Wire shape of a cursor
#[derive(Debug, Serialize, Deserialize)]
struct CursorClaims {
    previous_encoded_cursor: Option<String>,
    sort_field_key: String,
    sort_field_type: SortFieldType,
    operator: CursorOperator,
    value: serde_json::Value,
    id: i64,
}

impl From<&Cursor> for CursorClaims {
    fn from(cursor: &Cursor) -> Self {
        Self {
            previous_encoded_cursor: cursor.previous_cursor.clone(),
            sort_field_key: cursor.sort_field_key.clone(),
            sort_field_type: cursor.sort_field_type(),
            operator: cursor.operator,
            value: cursor.value.to_json(),
            id: cursor.tie_break_id,
        }
    }
}

impl TryFrom<CursorClaims> for Cursor {
    type Error = PaginationError;

    fn try_from(claims: CursorClaims) -> Result<Self, Self::Error> {
        let sort_field_type = claims.sort_field_type;
        let value = SortValue::from_json(sort_field_type, claims.value).ok_or_else(|| {
            PaginationError::invalid_cursor(format!(
                "value does not match sort type '{}'",
                sort_field_type
            ))
        })?;

        if claims.sort_field_key.is_empty() {
            return Err(PaginationError::invalid_cursor("sort field key is empty"));
        }

        Ok(Cursor {
            previous_cursor: claims.previous_encoded_cursor,
            sort_field_key: claims.sort_field_key,
            operator: claims.operator,
            value,
            tie_break_id: claims.id,
        })
    }
}

/// Signs and verifies cursor tokens
///
/// Built once at startup from the configured secret and algorithm and then
/// shared read-only between requests.
pub struct CursorCodec {
    header: Header,
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for CursorCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorCodec")
            .field("algorithm", &self.header.alg)
            .finish_non_exhaustive()
    }
}

impl CursorCodec {
    /// Create a codec for an HMAC algorithm (`HS256`, `HS384`, `HS512`)
    pub fn new(secret: &[u8], algorithm: Algorithm) -> Result<Self, PaginationError> {
        if !matches!(
            algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(PaginationError::Configuration {
                message: format!("{:?} is not a shared-secret algorithm", algorithm),
            });
        }
        if secret.is_empty() {
            return Err(PaginationError::Configuration {
                message: "secret key is empty".to_string(),
            });
        }

        let mut validation = Validation::new(algorithm);
        // Cursors carry no registered claims
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        validation.validate_aud = false;

        Ok(Self {
            header: Header::new(algorithm),
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        })
    }

    /// Create a codec from an algorithm name such as `"HS256"`
    pub fn from_secret(secret: &str, algorithm: &str) -> Result<Self, PaginationError> {
        let algorithm =
            Algorithm::from_str(algorithm).map_err(|_| PaginationError::Configuration {
                message: format!("unknown algorithm '{}'", algorithm),
            })?;
        Self::new(secret.as_bytes(), algorithm)
    }

    pub fn algorithm(&self) -> Algorithm {
        self.header.alg
    }

    /// Serialize and sign a cursor
    pub fn encode(&self, cursor: &Cursor) -> Result<String, PaginationError> {
        jsonwebtoken::encode(&self.header, &CursorClaims::from(cursor), &self.encoding).map_err(
            |e| PaginationError::CursorEncoding {
                message: e.to_string(),
            },
        )
    }

    /// Verify and deserialize a cursor token
    pub fn decode(&self, token: &str) -> Result<Cursor, PaginationError> {
        if token.is_empty() {
            return Err(PaginationError::invalid_cursor("token is empty"));
        }
        if token.len() > MAX_CURSOR_TOKEN_LEN {
            return Err(PaginationError::invalid_cursor(format!(
                "token exceeds {} bytes",
                MAX_CURSOR_TOKEN_LEN
            )));
        }

        let data = jsonwebtoken::decode::<CursorClaims>(token, &self.decoding, &self.validation)
            .map_err(|e| PaginationError::invalid_cursor(e.to_string()))?;

        Cursor::try_from(data.claims)
    }
}
