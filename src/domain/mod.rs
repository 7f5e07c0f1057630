pub mod company_record;
pub mod lookup_error;
pub mod query_context;

pub use company_record::*;
pub use lookup_error::*;
pub use query_context::*;
