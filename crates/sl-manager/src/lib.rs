//! `sl-manager` — labelled log collections and session handling.
//!
//! | Module       | Contents                                              |
//! |--------------|-------------------------------------------------------|
//! | [`manager`]  | `LoggingManager` — log / save / clear / delete        |
//! | [`config`]   | `ManagerConfig`, loaded from JSON                     |
//! | [`error`]    | `ManagerError`, `ManagerResult`                       |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                    |
//! |------------|-----------------------------------------------------------|
//! | `parallel` | `save_all_logs` writes collections on Rayon's pool.       |
//! | `fx-hash`  | FxHash for the collection map and column index.           |
//! | `sqlite`   | Re-enables `sl_output::SqliteUploader`.                   |
//! | `parquet`  | Re-enables `sl_output::ParquetUploader`.                  |

pub mod config;
pub mod error;
pub mod manager;


pub use config::ManagerConfig;
pub use error::{ManagerError, ManagerResult};
pub use manager::{LoggingManager, META_COLLECTION, SaveResult};
