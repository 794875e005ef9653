pub mod log_entry;
pub mod projection;
pub mod session;

pub use log_entry::{CONFIDENCE_LEVEL, LogEntry};
pub use projection::ProjectionPoint;
pub use session::{Credentials, Session, SessionUser};
