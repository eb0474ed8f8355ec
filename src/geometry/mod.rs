pub mod curve;
pub mod primitives;

pub use curve::{Arc2, CatmullRom, CubicBezier, Curve, Polyline};
pub use primitives::NodeLookup;
