pub mod estimator;
pub mod event;

pub use estimator::{HeadingEstimator, HeadingUpdate};
pub use event::{HEADING_UPDATED, HeadingEvent};
