pub mod extract;
pub mod metrics;
pub mod modes;
pub mod session;
pub mod time;

pub use extract::*;
pub use metrics::*;
pub use modes::*;
pub use session::*;
pub use time::*;
