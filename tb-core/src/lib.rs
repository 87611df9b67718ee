//! Core library for Tilebrot.
//!
//! Tilebrot computes escape-time fractals by grid decomposition: a root
//! [`BoundingBox`] is [`split`](BoundingBox::split) into an n×n [`Grid`] of
//! tiles, each tile is evaluated independently with [`compute`], and the
//! per-tile [`EscapeMatrix`] results are recombined with [`assemble`] into a
//! single full-resolution matrix. The parallel dispatch of tiles lives in the
//! `tb-sched` crate; everything here is sequential and side-effect free.

mod assemble;
mod bbox;
mod compute;
mod error;
mod grid;
mod kernel;
mod matrix;

pub use assemble::assemble;
pub use bbox::BoundingBox;
pub use compute::compute;
pub use error::Error;
pub use grid::Grid;
pub use kernel::{Julia, Kernel, Mandelbrot};
pub use matrix::EscapeMatrix;

pub mod image;
