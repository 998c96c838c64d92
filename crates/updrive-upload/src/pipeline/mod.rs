//! Upload pipeline stages.
//!
//! source stream → [`ByteCounter`] → sink, composed by [`pipe`].

mod counter;
mod pipe;

pub use counter::ByteCounter;
pub(crate) use counter::publish;
pub use pipe::pipe;
