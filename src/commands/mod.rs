pub mod meta;
pub mod query;
pub mod router;
pub mod schema;

pub use router::{Flow, Session};
