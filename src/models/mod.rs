pub mod advisory;
pub mod reading;
pub mod sensor;

pub use advisory::*;
pub use reading::*;
pub use sensor::*;
