//! URL helpers for Scrap
//!
//! Dedup keys for buckets and link resolution for handlers. The engine itself
//! never rewrites URLs: a queued href reaches the bucket and the retriever
//! exactly as written.

mod normalize;
mod resolve;

pub use normalize::bucket_key;
pub use resolve::resolve_link;
