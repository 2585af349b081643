pub mod defaults;
pub mod error;

pub use defaults::CipherDefaults;
pub use error::{LockboxError, LockboxResult};
