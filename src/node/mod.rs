mod branch;
mod slot;

pub use branch::Branch;
pub use slot::Slot;
