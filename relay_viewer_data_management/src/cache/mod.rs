mod disk_cache;
mod memory_cache;

pub use disk_cache::*;
pub use memory_cache::*;
