//! State module for tracking crawl progress
//!
//! `PageState` records what happened to each URL taken off the frontier
//! (processed, disallowed by robots.txt, or one of the failure kinds).

mod page_state;

pub use page_state::PageState;
