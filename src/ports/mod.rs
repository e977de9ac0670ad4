//! Ports (trait boundaries) for external collaborators.
//!
//! The game driver talks to players only through [`Player`], and training
//! reports progress only through [`TrainingObserver`].

pub mod observer;
pub mod player;

pub use observer::TrainingObserver;
pub use player::Player;
