// Cucumber Step Definitions Module
//
// Step definitions are grouped by feature area. The shared World lives in
// `common`.

pub mod common;
pub mod conversion;
pub mod feed;

pub use common::FeedWorld;
