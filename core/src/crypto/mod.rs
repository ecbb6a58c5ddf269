pub mod codec;
pub mod keys;
pub mod signature;

pub use codec::*;
pub use keys::*;
pub use signature::*;
