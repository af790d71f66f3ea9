pub mod crawl_handlers;
pub mod system_handlers;

pub use crawl_handlers::*;
pub use system_handlers::*;
