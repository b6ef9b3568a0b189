//! Poop Dodge - a terminal arcade game
//!
//! A cat at the bottom of the screen dodges falling poop. Every poop that
//! falls past scores a point; every hit costs one of three lives.
//!
//! - `entities`: pure data (session, player, obstacles, particles, buttons)
//! - `compute`: pure per-frame simulation and state transitions
//! - `particles`: collision debris
//! - `assets`: typed sprite lookup
//! - `audio`: optional sound cues
//! - `text`: Korean/English UI strings
//! - `config`: tuning and runtime options
//! - `display`: crossterm renderer

pub mod assets;
pub mod audio;
pub mod compute;
pub mod config;
pub mod display;
pub mod entities;
pub mod particles;
pub mod text;
