#![allow(dead_code)]

pub mod builders;
pub mod dns_server_mock;
pub mod fake_gateway;
pub mod mock_resolvers;
pub mod stub_exchange;

pub use builders::*;
pub use dns_server_mock::{MockDnsServer, Protocol};
pub use fake_gateway::FakeGateway;
pub use mock_resolvers::{DelayedRecursiveResolver, FixedIterativeResolver};
pub use stub_exchange::StubExchange;
