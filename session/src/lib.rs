//! Pieces shared by the `easyapps`, `mail` and `network` clients: the HTTP
//! session every request goes through, anti-forgery request signing, tracking
//! of fire-and-forget requests and the notices shown to the user.

pub mod cli;
pub mod client;
pub mod cookie;
pub mod notice;
pub mod settings;
pub mod signer;
pub mod tasks;

pub use client::{Session, SessionConfig, ensure_success};
pub use cookie::get_cookie;
pub use notice::{Notice, NoticeLevel, Notices};
pub use signer::{CsrfSigner, NoopSigner, RequestSigner};
pub use tasks::{BackgroundTasks, TaskOutcome};
