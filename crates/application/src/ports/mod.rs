mod coordination_store;
mod iterative_resolver;
mod recursive_resolver;

pub use coordination_store::CoordinationStore;
pub use iterative_resolver::IterativeResolver;
pub use recursive_resolver::RecursiveResolver;

// Re-export for convenience
pub use dns_relay_domain::DnsQuestion;
