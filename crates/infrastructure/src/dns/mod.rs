pub mod codec;
pub mod exchange;
pub mod forwarding;
pub mod iterative;
pub mod server;
pub mod transport;

pub use codec::EnvelopeCodec;
pub use exchange::{DnsExchange, NetworkExchange};
pub use forwarding::{ForwardingResolver, MessageBuilder, MessageRenderer};
pub use iterative::{HierarchyWalker, NameserverCache};
pub use server::QueryServer;
