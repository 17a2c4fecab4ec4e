//! Tag classification for valves, instruments and equipment.

mod tags;

pub use tags::*;
