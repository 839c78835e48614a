pub mod source;
pub mod store;

pub use source::CachedSource;
pub use store::{PageStore, StoredPage};
