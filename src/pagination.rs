use base64::{engine::general_purpose::STANDARD, Engine};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ApiError;

/// Opaque continuation cursor for keyset pagination.
///
/// Encodes the `(occurred_at, id)` sort key of the last item on a page;
/// the next page starts strictly after it in descending order. The encoded
/// form is not a contract, clients must treat it as a black box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub occurred_at: OffsetDateTime,
    pub id: Uuid,
}

impl Cursor {
    pub fn encode(&self) -> String {
        let raw = format!("{}|{}", self.occurred_at.unix_timestamp_nanos(), self.id);
        STANDARD.encode(raw)
    }

    pub fn decode(input: &str) -> Result<Self, ApiError> {
        let invalid = || ApiError::Validation("invalid cursor".into());

        let raw = STANDARD.decode(input).map_err(|_| invalid())?;
        let raw = String::from_utf8(raw).map_err(|_| invalid())?;
        let (nanos, id) = raw.split_once('|').ok_or_else(invalid)?;

        let nanos = nanos.parse::<i128>().map_err(|_| invalid())?;
        let occurred_at =
            OffsetDateTime::from_unix_timestamp_nanos(nanos).map_err(|_| invalid())?;
        let id = Uuid::parse_str(id).map_err(|_| invalid())?;

        Ok(Self { occurred_at, id })
    }
}
