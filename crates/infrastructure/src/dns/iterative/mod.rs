pub mod nameserver_cache;
pub mod walker;

pub use nameserver_cache::NameserverCache;
pub use walker::HierarchyWalker;
