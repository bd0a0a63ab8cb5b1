//! Configuration document loading and management.

mod handle;
mod loader;
mod masked;
mod schema;
mod store;

pub use handle::*;
pub use loader::*;
pub use masked::*;
pub use schema::*;
pub use store::*;
