pub mod etcd;
mod gateway;

pub use etcd::EtcdCoordinationStore;
