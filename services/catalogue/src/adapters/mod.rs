pub mod http;
pub mod token_file;

pub use http::HttpCatalogueClient;
pub use token_file::FileTokenStorage;
