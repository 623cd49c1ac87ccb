//! `sl-core` — foundational types for the `session_log` framework.
//!
//! This crate is a dependency of every other `sl-*` crate.  It has no `sl-*`
//! dependencies of its own.
//!
//! # What lives here
//!
//! | Module          | Contents                                               |
//! |-----------------|--------------------------------------------------------|
//! | [`value`]       | `LogValue`, `Vec3`, `format_value` (value formatter)   |
//! | [`host`]        | `HostClock`, `HostLifecycle`, `SystemClock`, `FixedClock` |
//! | [`ids`]         | `SessionIds`, `HashedSessionIds`, `random_session_id`  |
//! | [`text`]        | `TextFormat`, the `NULL` sentinel, delimited-line writer |
//! | [`error`]       | `LogError`, `LogResult`                                |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to `LogValue` and `Vec3`.   |

pub mod error;
pub mod host;
pub mod ids;
pub mod text;
pub mod value;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{LogError, LogResult};
pub use host::{FixedClock, HostClock, HostLifecycle, SystemClock};
pub use ids::{HashedSessionIds, SessionIds, random_session_id};
pub use text::{LineWriter, NULL, TextFormat};
pub use value::{LogValue, Vec3, format_value};
