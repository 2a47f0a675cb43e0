//! Authentication: password hashing, the session table and the session extractor

pub mod extract;
pub mod password;
pub mod session;

pub use extract::CurrentSession;
pub use password::PasswordService;
pub use session::{SessionIdentity, SessionStore};
