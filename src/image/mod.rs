pub mod buffer;
pub mod io;

pub use self::buffer::{FloatPlane, GrayBuffer};
pub use self::io::OutputFormat;
