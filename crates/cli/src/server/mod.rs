pub mod dns;

pub use dns::bind_query_socket;
