//! SnapBooth Session
//!
//! Ties the booth together for one user at a time:
//! - **Booth:** capture and retake, live overlay editing, export tickets
//! - **Loader:** resolving sticker references to decoded rasters
//! - **Store:** the collage upload contract and a directory-backed store
//! - **Catalog:** the sticker catalog contract and a JSON-backed catalog
//!
//! Exports are split in three steps so a host can run the slow part off its
//! event loop: [`PhotoBooth::begin_export`] hands out an [`ExportTicket`],
//! the ticket renders asynchronously, and the result is handed back to the
//! booth, which drops it if the photo was retaken in the meantime.

pub mod booth;
pub mod catalog;
pub mod loader;
pub mod store;
pub mod ticket;

pub use booth::*;
pub use catalog::*;
pub use loader::*;
pub use store::*;
pub use ticket::*;
