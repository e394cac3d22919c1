pub mod in_memory;
pub mod payman;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
pub mod scripted;
