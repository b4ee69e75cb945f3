//! Seize & Secure laser tag scoreboard firmware for the ATmega128A
//!
//! The game core, display sequencer and drivers are target independent and
//! host tested; `hal` holds the register level code and only builds for AVR.
#![cfg_attr(not(test), no_std)]

pub mod application;
pub mod config;
pub mod display;
pub mod drivers;
pub mod error;
pub mod game;
#[cfg(target_arch = "avr")]
pub mod hal;
pub mod logger;
pub mod os;

pub use error::{Error, Result};
