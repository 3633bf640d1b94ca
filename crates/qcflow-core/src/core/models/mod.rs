//! # Core Models Module
//!
//! This module contains the fundamental data structures used to represent
//! molecular systems, providing the foundation for input deck generation and
//! job construction.
//!
//! ## Key Components
//!
//! - [`element`] - The periodic table and element lookup by symbol or number
//! - [`atom`] - Individual atom representation with unit-tagged coordinates
//! - [`geometry`] - An ordered collection of atoms with charge and
//!   multiplicity

pub mod atom;
pub mod element;
pub mod geometry;
