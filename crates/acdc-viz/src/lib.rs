//! Mode-shape visualization data.
//!
//! This crate provides:
//! - **Snapshot reader** for VTK XML PolyData (`.vtp`) mesh-motion files
//! - **Mode data** model: ordered frames of named components, each an
//!   ordered line of 3-D points with optional orientation
//! - **Tip extraction** producing per-frame tip deflection series for plots
//!
//! ```rust,no_run
//! use acdc_viz::parse_mode_data;
//!
//! let data = parse_mode_data(&[
//!     "case.Mode1.LinTime1.ED_TowerLn2Mesh_motion.001.vtp",
//!     "case.Mode1.LinTime1.ED_TowerLn2Mesh_motion.002.vtp",
//! ])?;
//! let tip = data.tip_deflection("ED_TowerLn2Mesh_motion");
//! println!("{:?} {:?}", tip.flap, tip.edge);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod mode;
pub mod vtp;

pub use error::{ModeError, Result};
pub use mode::{Component, Frame, ModeData, Point, TipSeries};
pub use vtp::{component_name_from_path, parse_frame, parse_frame_str, parse_mode_data};
