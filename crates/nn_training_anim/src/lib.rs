//! Neural Network Training Animation
//!
//! Command surface, configuration and the two frontends (interactive window
//! and video export) around `nn_anim_core`.

pub mod cli;
pub mod config;
pub mod export;
pub mod gui;
pub mod launch;
