use crate::models::ResponseCode;

/// Status reported when no HTTP response was received at all
pub const TRANSPORT_FAILURE_STATUS: u16 = 0;

/// Map an HTTP status code onto a [`ResponseCode`]
///
/// Total: every status not listed below maps to `Unknown`, including the
/// 2xx codes. Callers decide success from the exact status they expect.
pub fn status_to_response_code(status: u16) -> ResponseCode {
    match status {
        TRANSPORT_FAILURE_STATUS => ResponseCode::ConnectionRefused,
        304 => ResponseCode::NotModified,
        403 => ResponseCode::AccessForbidden,
        404 => ResponseCode::NotFound,
        409 => ResponseCode::ConcurrencyException,
        500 => ResponseCode::ServerError,
        503 => ResponseCode::ConnectionRefused,
        _ => ResponseCode::Unknown,
    }
}
