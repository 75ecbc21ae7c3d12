pub mod connection;
pub mod migrations;
pub mod slot;

pub use connection::{connect, connect_with_settings, DbPool};
pub use slot::SqlCartSlot;
