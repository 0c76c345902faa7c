//! Data models
//!
//! Shared between loyalty-server and client surfaces (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY), timestamps are Unix millis.

pub mod event;
pub mod member;
pub mod membership;
pub mod merchant;
pub mod redemption;
pub mod reward;
pub mod transaction;

// Re-exports
pub use event::*;
pub use member::*;
pub use membership::*;
pub use merchant::*;
pub use redemption::*;
pub use reward::*;
pub use transaction::*;
