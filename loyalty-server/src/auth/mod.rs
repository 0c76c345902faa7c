//! Caller Identity
//!
//! Identities arrive as trusted headers set by the platform gateway:
//! `X-Member-Id` for the member app and `X-Staff-Id` plus `X-Merchant-Id`
//! for the merchant console. The extractors validate presence and shape
//! only; the gateway has already authenticated the token.

mod extractor;

/// Authenticated member (the loyalty app caller)
#[derive(Debug, Clone)]
pub struct CurrentMember {
    pub member_id: i64,
}

/// Authenticated staff operator acting for one merchant
#[derive(Debug, Clone)]
pub struct CurrentStaff {
    pub staff_id: i64,
    pub merchant_id: i64,
}

pub const MEMBER_ID_HEADER: &str = "x-member-id";
pub const STAFF_ID_HEADER: &str = "x-staff-id";
pub const MERCHANT_ID_HEADER: &str = "x-merchant-id";
