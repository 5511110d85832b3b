//! One module per third-party service, each wrapping it behind a client with
//! an overridable base URL.

pub mod ikuuu;
pub mod ipzan;
pub mod leaflow;
pub mod rainyun;
pub mod tline;
