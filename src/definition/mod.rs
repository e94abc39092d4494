//! Resource definitions
//!
//! Turning YAML definition files into fully populated resources.
//!
//! - [`interpolate`] - `{{variable}}` substitution and the [`Resolved`] wrapper
//! - [`loader`] - reading definition files and the files they include
//! - [`targets`] - CSV and YAML target lists for groups
//!
//! # Example
//!
//! ```ignore
//! use gophish_client::definition::{load, Variables};
//! use gophish_client::models::Group;
//!
//! let vars: Variables = [("client".into(), "Acme".into())].into();
//! let group = load::<Group>("defs/groups/finance.yaml", &vars)?;
//! println!("{} targets", group.targets.len());
//! ```

pub mod interpolate;
pub mod loader;
pub mod targets;

pub use interpolate::{
    interpolate, Interpolate, InterpolationError, Interpolator, Resolved, UnknownKeys, Variables,
};
pub use loader::{load, load_with, Definition};
pub use targets::read_targets;
