pub mod corpus;
pub mod error;
pub mod hash;
pub mod record;

pub use corpus::*;
pub use error::*;
pub use hash::*;
pub use record::*;
