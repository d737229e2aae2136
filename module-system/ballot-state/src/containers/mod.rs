mod map;
mod value;

pub use map::StateMap;
pub use value::StateValue;
