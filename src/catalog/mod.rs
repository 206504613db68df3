pub mod http;
pub mod memory;
pub mod traits;

pub use http::HttpCatalog;
pub use memory::InMemoryCatalog;
pub use traits::CatalogSource;
