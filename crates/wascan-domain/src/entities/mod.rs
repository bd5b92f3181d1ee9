//! Domain entities

mod frame;

pub use frame::LumaFrame;
