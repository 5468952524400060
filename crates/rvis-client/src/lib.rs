pub mod parser;
pub mod script;
pub mod table;
pub mod token;
pub mod transport;

pub use parser::RegistryPageParser;
pub use script::extract_script_locations;
pub use table::extract_table_rows;
pub use token::extract_token;
pub use transport::ReqwestTransport;
