#![deny(warnings)]

//! Runtime pieces that sit between the pure engine and a presentation layer:
//! a parameter store that recomputes on change, and a clock-driven mock
//! community feed.

mod feed;
mod session;

pub use feed::{FeedMessage, MockFeed, CONNECT_DELAY, INITIAL_ONLINE};
pub use session::Session;
