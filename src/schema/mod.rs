pub mod defaults;
pub mod draft;
pub mod types;
pub mod validator;

pub use defaults::*;
pub use draft::*;
pub use types::*;
pub use validator::*;
