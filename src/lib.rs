//! # maxent-persist: GIS model persistence
//!
//! Saves and loads maximum-entropy classification models trained with
//! Generalized Iterative Scaling.
//!
//! ## Architecture
//!
//! - **io**: model type, field layout, codec traits, the plain-text codec and
//!   gzip/zstd transports
//! - **cli**: command-line interface for inspecting and converting models
//!
//! ## Example
//!
//! ```
//! use maxent_persist::io::{from_text, to_text, ActiveOutcome, GisModel};
//!
//! let model = GisModel::new(
//!     5,
//!     0.25,
//!     vec!["yes".into(), "no".into()],
//!     vec!["word=the".into()],
//!     vec![vec![ActiveOutcome::new(0, 1.386294)]],
//! )
//! .unwrap();
//!
//! let text = to_text(&model).unwrap();
//! assert_eq!(from_text(&text).unwrap(), model);
//! ```

pub mod cli;
pub mod io;

pub mod error;

// Re-export commonly used types
pub use error::{Error, MalformedError, ModelInvariant, Result};
pub use io::{load_model, save_model, GisModel};
