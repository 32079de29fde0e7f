mod utils;
mod constant;
mod event;

pub use utils::*;
pub use constant::*;
pub use event::*;
