pub mod handlers;
pub mod markdown;
pub mod store;

pub use handlers::{routes, WikiState};
pub use store::{Entry, EntryStore};
