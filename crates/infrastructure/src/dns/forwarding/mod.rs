pub mod forwarder;
pub mod message_builder;
pub mod renderer;

pub use forwarder::ForwardingResolver;
pub use message_builder::MessageBuilder;
pub use renderer::MessageRenderer;
