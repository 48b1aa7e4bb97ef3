//! `price-scout init`: write an editable `.price-scout/` from the embedded
//! templates.
//!
//! ```no_run
//! use ps_core::init::{generate_price_scout_structure, InitOptions};
//!
//! # async fn example() -> Result<(), ps_core::init::InitError> {
//! let written = generate_price_scout_structure(InitOptions {
//!     minimal: true,
//!     ..InitOptions::default()
//! })
//! .await?;
//! assert_eq!(written, vec!["config.toml".to_string()]);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod generator;
pub mod templates;

pub use error::{InitError, InitResult};
pub use generator::{generate_price_scout_structure, InitOptions};
pub use templates::{get_template, list_templates};
