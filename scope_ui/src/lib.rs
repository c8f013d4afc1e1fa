#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Terminal rendering of dashboard frames.
//!
//! Pure string building: no I/O, no clocks besides formatting the wall time
//! carried in the view.
pub mod band;
pub mod render;

pub use band::Band;
pub use render::{CLEAR_SCREEN, RenderOptions, format_value, render};
