// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Geometric primitives for Schottky groups.
//!
//! This module contains the small amount of plane geometry the series walks
//! need:
//! - Mobius: normalized 2×2 complex transformations
//! - Circle: isometric circles and their images
//! - constants: budget, tolerance and evaluability constants

pub mod circle;
pub mod constants;
pub mod mobius;

pub use circle::Circle;
pub use constants::*;
pub use mobius::Mobius;
