pub mod pages;
pub mod predict;
pub mod system;

pub use pages::*;
pub use predict::*;
pub use system::*;
