pub mod intersection;
pub mod manual;
pub mod auto;

pub use intersection::IntersectionVisibility;
pub use manual::{ManualObserver, ManualVisibility};
pub use auto::auto_detect_visibility;
