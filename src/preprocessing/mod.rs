pub mod align;
pub mod categorical;
pub mod frame;

pub use align::align;
pub use categorical::CategoricalEncoder;
pub use frame::{Cell, Frame, RawRecord};
