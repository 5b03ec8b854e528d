// routes/mod.rs
// Public re-exports of all route handlers.

pub mod enroll;
pub mod factors;
pub mod login;
pub mod qrcode;
pub mod secret;

pub use enroll::enroll;
pub use factors::{factor_delete, factors_index};
pub use login::login;
pub use secret::secret_generate;
