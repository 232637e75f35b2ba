mod execute_options;
mod query;
mod simple_statement;

pub use crate::statement::execute_options::ExecuteOptions;
pub use crate::statement::query::{CqlStatement, Query};
pub use crate::statement::simple_statement::Statement;
