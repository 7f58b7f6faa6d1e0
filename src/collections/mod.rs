//! Collections used by the adapter and by pipeline components.

mod ring_array;

pub use ring_array::{IntoIter, Iter, RingArray};
