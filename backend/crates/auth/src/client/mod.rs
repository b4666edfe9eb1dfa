//! Client Runtime
//!
//! Per-tab auth state for client-rendered code. Nothing here is global:
//! the application root builds one [`SessionClient`] and one
//! [`AuthContext`] and hands them to whatever needs them.

pub mod context;
pub mod form;
pub mod navigation;
pub mod session_client;
pub mod storage;
pub mod theme;

pub use context::AuthContext;
pub use form::{AuthForm, FormKind, SubmitOutcome};
pub use navigation::{Navigator, sign_out_and_navigate};
pub use session_client::{SessionClient, Subscription};
pub use storage::{ClientStorage, MemoryStorage, StorageError};
pub use theme::ThemePreference;
