//! `sl-store` — the schema-evolving log accumulator for `session_log`.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                 |
//! |-----------------|----------------------------------------------------------|
//! | [`store`]       | `LogStore` — add / terminate / clear / export            |
//! | [`builder`]     | `LogStoreBuilder` (fluent construction)                  |
//! | [`column`]      | `Column` and the column arena                            |
//! | [`snapshot`]    | `TableSnapshot` — owned copy handed to exporters         |
//! | [`mode`]        | `ExportMode`, `MetaColumns`, `ExportKind`, `Export`      |
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                  |
//! |-----------|---------------------------------------------------------|
//! | `fx-hash` | FxHash instead of SipHash for the column-name index.    |
//!
//! # Alignment invariant
//!
//! After every [`LogStore::terminate_row`], every column has exactly
//! [`LogStore::nb_lines`] entries.  Columns that first appear mid-session are
//! backfilled with the `NULL` sentinel.

pub mod builder;
pub mod column;
pub mod mode;
mod pending;
pub mod snapshot;
pub mod store;

#[cfg(test)]
mod tests;

pub use builder::{ANONYMOUS_EMAIL, LogStoreBuilder};
pub use column::{Cell, Column};
pub use mode::{Export, ExportKind, ExportMode, MetaColumns, RowAdvance};
pub use snapshot::TableSnapshot;
pub use store::LogStore;
