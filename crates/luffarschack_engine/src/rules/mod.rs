//! Game rules.
//!
//! Pure functions over a [`Board`](crate::Board). Both the state machine and
//! the opponent selector ask these the same questions, so the line table
//! lives in exactly one place.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::{LINES, winning_mark};
