//! Journal domain module

mod turn;

pub use turn::{excerpt, Turn, TurnId};
