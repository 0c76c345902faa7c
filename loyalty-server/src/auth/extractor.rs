//! Identity Extractors
//!
//! Custom extractors that pull the gateway-verified identity headers
//! off each request. Handlers declare `CurrentMember` or `CurrentStaff`
//! as an argument and the router rejects unidentified calls before the
//! handler body runs.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::{CurrentMember, CurrentStaff, MEMBER_ID_HEADER, MERCHANT_ID_HEADER, STAFF_ID_HEADER};
use crate::core::ServerState;
use crate::utils::AppError;

fn header_id(parts: &Parts, name: &str) -> Option<i64> {
    parts
        .headers
        .get(name)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|id| *id > 0)
}

impl FromRequestParts<ServerState> for CurrentMember {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // Reuse if middleware already extracted it
        if let Some(member) = parts.extensions.get::<CurrentMember>() {
            return Ok(member.clone());
        }

        match header_id(parts, MEMBER_ID_HEADER) {
            Some(member_id) => {
                let member = CurrentMember { member_id };
                parts.extensions.insert(member.clone());
                Ok(member)
            }
            None => {
                tracing::warn!(uri = %parts.uri, "member identity header missing");
                Err(AppError::Unauthorized)
            }
        }
    }
}

impl FromRequestParts<ServerState> for CurrentStaff {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(staff) = parts.extensions.get::<CurrentStaff>() {
            return Ok(staff.clone());
        }

        let staff_id = header_id(parts, STAFF_ID_HEADER);
        let merchant_id = header_id(parts, MERCHANT_ID_HEADER);
        match (staff_id, merchant_id) {
            (Some(staff_id), Some(merchant_id)) => {
                let staff = CurrentStaff {
                    staff_id,
                    merchant_id,
                };
                parts.extensions.insert(staff.clone());
                Ok(staff)
            }
            _ => {
                tracing::warn!(uri = %parts.uri, "staff identity headers missing");
                Err(AppError::Unauthorized)
            }
        }
    }
}
