mod export;
mod session;

pub use export::*;
pub use session::*;
