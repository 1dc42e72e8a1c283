// Result handling - rows and result sets shared by both connection strategies

mod result_set;
mod row;

pub use result_set::ResultSet;
pub use row::Row;
