//! # Pixelmorph Library
//!
//! The `pixelmorph` library computes a correspondence between the pixels of two
//! equally-sized images and animates each source pixel as a particle traveling
//! from its source position to its matched target position, reproducing the
//! target image over time using only colors drawn from the source.
//!
//! The matching is a deterministic ordering-based heuristic, not an optimal
//! bipartite assignment: structurally important pixels (strong edges) are
//! matched against each other first, and the remainder is paired by brightness
//! order.
//!
//! ## Overview of Modules
//!
//! - **`photo`**: Defines a basic `Photo` struct for storing pixel data (RGBA
//!   format) with a validated construction boundary, pixel access, and
//!   aspect-preserving scaling into a bounding box.
//!
//! - **`pixel_features`**: Turns a pixel grid into a flat, row-major list of
//!   `PixelFeature` records carrying BT.601 brightness and a forward-difference
//!   edge strength.
//!
//! - **`correspondence`**: Partitions and sorts the feature lists of two images
//!   (Edge Prioritization: top 25% by edge strength, remainder by brightness)
//!   and emits an ordered list of `Particle`s — source color plus start and end
//!   positions.
//!
//! - **`animator`**: A poll-driven animation state machine that interpolates
//!   every particle with a cubic ease-in-out curve and rasterizes each frame
//!   into an owned RGBA buffer; the host supplies frame timestamps and blits
//!   the buffer.
//!
//! - **`error`**: The library error type. Most operations degrade silently on
//!   mismatched input sizes; only a malformed pixel buffer is an error.

pub mod animator;
pub mod correspondence;
pub mod error;
pub mod photo;
pub mod pixel_features;

pub use animator::{AnimatorState, ParticleAnimator};
pub use correspondence::{build_particles, Particle};
pub use error::PixelmorphError;
pub use photo::Photo;
pub use pixel_features::{extract_features, PixelFeature};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
