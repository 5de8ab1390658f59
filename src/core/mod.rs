pub mod clock;
pub mod frame;
pub mod gpu_context;

pub use clock::*;
pub use frame::*;
pub use gpu_context::*;
