pub mod preprocessing;
pub mod detection;
pub mod threshold;
pub mod contours;

pub use preprocessing::*;
pub use detection::*;
pub use threshold::*;
pub use contours::*;
