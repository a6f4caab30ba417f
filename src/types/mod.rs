pub mod metrics;
pub mod record;
pub mod row;

pub use metrics::*;
pub use record::*;
pub use row::*;
