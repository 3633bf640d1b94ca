//! # Core Module
//!
//! This module provides the fundamental building blocks for quantum-chemistry
//! batch automation, serving as the stateless foundation of the library.
//!
//! ## Overview
//!
//! The core module implements the data structures and parsers required to
//! describe molecular systems, select computational methods, and extract
//! typed numeric results from the loosely structured text emitted by an
//! external engine.
//!
//! ## Architecture
//!
//! The module is organized into specialized submodules that handle different
//! aspects of the problem:
//!
//! - **Molecular Representation** ([`models`]) - Atoms, elements, and
//!   geometries with charge and multiplicity
//! - **File I/O** ([`io`]) - Parsers for the XYZ geometry format and for
//!   engine output logs, with a two-tier file/line error model
//! - **Method Registry** ([`methods`]) - Static descriptors for supported
//!   computational methods, basis sets, and spin-component scaling

pub mod io;
pub mod methods;
pub mod models;
