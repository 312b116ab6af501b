pub mod product;
pub mod session;

pub use product::*;
pub use session::*;
