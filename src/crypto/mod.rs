pub mod csrf;

pub use csrf::{CsrfGuard, CsrfRejection};
