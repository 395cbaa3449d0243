use std::fmt;

use super::models::ApiError;
use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ZoneAlreadyExists,
    InvalidRequestHeaders,
    IdenticalRecordExists,
    DnsRecordInvalid,
    UserCredsInvalid,
    ExceededZonesLimit,
    /// Any code not listed in the table.
    RequestFailed,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::ZoneAlreadyExists => "zone already exists",
            ErrorKind::InvalidRequestHeaders => "invalid request headers",
            ErrorKind::IdenticalRecordExists => "identical record exists",
            ErrorKind::DnsRecordInvalid => "DNS record invalid",
            ErrorKind::UserCredsInvalid => "user credentials invalid",
            ErrorKind::ExceededZonesLimit => "exceeded zones limit",
            ErrorKind::RequestFailed => "Cloudflare request failed",
        };
        f.write_str(s)
    }
}

// Reference: https://developers.cloudflare.com/fundamentals/api/reference/
// 1061 / 10006: zone already exists
// 6003: invalid request headers, 6103: invalid X-Auth-Key format,
// 6111: invalid Authorization header format
// 81058: a record with those settings already exists
// 9002: DNS record type is invalid
// 1118: account has exceeded the limit for adding zones
// 9103: unknown X-Auth-Key or X-Auth-Email, 9109: unauthorized, 10000: authentication error
const ERROR_CODES: &[(u32, ErrorKind)] = &[
    (1061, ErrorKind::ZoneAlreadyExists),
    (10006, ErrorKind::ZoneAlreadyExists),
    (6003, ErrorKind::InvalidRequestHeaders),
    (6103, ErrorKind::InvalidRequestHeaders),
    (6111, ErrorKind::InvalidRequestHeaders),
    (81058, ErrorKind::IdenticalRecordExists),
    (9002, ErrorKind::DnsRecordInvalid),
    (1118, ErrorKind::ExceededZonesLimit),
    (9103, ErrorKind::UserCredsInvalid),
    (9109, ErrorKind::UserCredsInvalid),
    (10000, ErrorKind::UserCredsInvalid),
];

pub fn kind_for_code(code: u32) -> Option<ErrorKind> {
    ERROR_CODES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, kind)| *kind)
}

/// Only 6111 is honoured inside an error chain.
fn kind_for_entry(entry: &ApiError) -> Option<ErrorKind> {
    kind_for_code(entry.code).or_else(|| {
        entry
            .error_chain
            .iter()
            .any(|link| link.code == 6111)
            .then_some(ErrorKind::InvalidRequestHeaders)
    })
}

/// Turns the `errors` list of a failed envelope into a single error.
///
/// The first entry with a known code wins. Without one, the first entry is
/// reported as [`ErrorKind::RequestFailed`] with its raw code and message.
pub fn map_api_errors(errors: &[ApiError]) -> Error {
    if let Some((entry, kind)) = errors
        .iter()
        .find_map(|e| kind_for_entry(e).map(|kind| (e, kind)))
    {
        return Error::Api {
            kind,
            code: entry.code,
            message: entry.message.clone(),
        };
    }

    match errors.first() {
        Some(entry) => Error::Api {
            kind: ErrorKind::RequestFailed,
            code: entry.code,
            message: entry.message.clone(),
        },
        None => Error::Api {
            kind: ErrorKind::RequestFailed,
            code: 0,
            message: "Cloudflare reported failure without errors".to_string(),
        },
    }
}
