//! Rewards Domain
//!
//! 积分与兑换核心 / Points and redemption core:
//! - `claim_window`: pure calendar math for yearly claim windows
//! - `ledger`: append-only points ledger with atomic balance guards
//! - `redemption`: the QR redemption session state machine
//! - `special`: once-per-year special reward claims
//! - `notify`: outbound notification seam

pub mod claim_window;
pub mod ledger;
pub mod notify;
pub mod redemption;
pub mod special;

pub use ledger::PointsLedger;
pub use notify::{LogNotifier, Notifier};
pub use redemption::{CreatedRedemption, RedemptionCoordinator, DEFAULT_REDEMPTION_TTL_MS};
pub use special::{ClaimOutcome, RewardGrant, SpecialRewardClaimService};
