//! Upstream client for the Visual Crossing timeline API.

mod visual_crossing;

pub use visual_crossing::VisualCrossingClient;
