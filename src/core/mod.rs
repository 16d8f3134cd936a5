//! # Core Module
//!
//! Shared-resource containers used across the terrain's threads.
//!
//! ## Usage
//! ```rust
//! use voxel_terrain::core::MtResource;
//!
//! let counter = MtResource::new(0);
//! *counter.get_mut() += 1;
//! assert_eq!(*counter.get(), 1);
//! ```

pub mod mt_resource;

pub use mt_resource::{lock_recovering, MtResource};
