use dns_relay_application::use_cases::ResolveEnvelopeUseCase;
use dns_relay_domain::{Config, ConfigError};
use dns_relay_infrastructure::dns::{
    DnsExchange, ForwardingResolver, HierarchyWalker, NameserverCache, NetworkExchange,
    QueryServer,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub struct DnsServices {
    pub query_server: QueryServer,
}

impl DnsServices {
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let resolver = &config.resolver;

        let exchange: Arc<dyn DnsExchange> = Arc::new(NetworkExchange::new(
            Duration::from_millis(resolver.query_timeout_ms),
        ));

        let recursive = Arc::new(
            ForwardingResolver::new(Arc::clone(&exchange), resolver.upstream_port)
                .with_line_filter(resolver.line_filter),
        );

        let cache = Arc::new(NameserverCache::new(resolver.nameserver_cache_capacity));
        let iterative = Arc::new(
            HierarchyWalker::new(exchange, resolver.root_server_addrs()?, cache)
                .with_max_hops(resolver.iterative_max_hops)
                .with_max_cname_chain(resolver.iterative_max_cname_chain)
                .with_port(resolver.upstream_port),
        );

        info!(
            timeout_ms = resolver.query_timeout_ms,
            line_filter = resolver.line_filter.as_str(),
            max_hops = resolver.iterative_max_hops,
            cache_capacity = resolver.nameserver_cache_capacity,
            "DNS services initialized"
        );

        let use_case = Arc::new(ResolveEnvelopeUseCase::new(recursive, iterative));
        let query_server = QueryServer::new(use_case)
            .with_max_in_flight(config.server.max_in_flight)
            .with_recv_buffer_size(config.server.recv_buffer_size);

        Ok(Self { query_server })
    }
}
