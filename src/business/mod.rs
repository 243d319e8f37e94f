//! Business logic: the input debounce and pronunciation dispatcher.

mod dispatcher;

pub use dispatcher::{KeyDispatcher, KeyOutcome, RenderState};
