pub mod course;
pub mod material;
pub mod session;

pub use course::*;
pub use material::*;
pub use session::*;
