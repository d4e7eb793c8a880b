pub mod protocol;
pub mod config;
pub mod error;
pub mod status;
pub mod timer;

pub use protocol::*;
pub use config::*;
pub use error::*;
pub use status::*;
pub use timer::*;
