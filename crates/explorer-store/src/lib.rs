mod schema;
mod store;

pub use store::{SqliteUiStateStore, StoreError};
