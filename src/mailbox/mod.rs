pub mod imap;
pub mod mime;
pub mod traits;

pub use self::imap::ImapSource;
pub use traits::{AlertEmail, MailSource};
