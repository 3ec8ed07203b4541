pub mod play;
pub mod shared;
