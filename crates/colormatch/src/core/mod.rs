mod conversion;
mod difference;
mod equality;

// conversion
pub use conversion::{to_lab, Lab};
pub(crate) use conversion::{from_channels, to_channels, MAX_RGB};

// difference
pub use difference::DistanceMetric;
pub(crate) use difference::find_closest;

// equality
pub use equality::to_eq_bits;
