//! Render a `select` element as a list of clickable items.
//!
//! The widget mirrors an exclusive-choice data source (the `option` entries of
//! a `select`) as a generated list, keeps both sides consistent, and exposes a
//! small named-method API through [`Registry`] for driving instances bound to
//! particular elements.
//!
//! ```ignore
//! let dom = Dom::new();
//! let mut registry = Registry::new(dom.clone());
//! registry.bind(&[select], Options::new().on_change(|_, value, label| {
//!     log::info!("picked {value} ({label})");
//! }));
//! registry.invoke(&[select], "disable", &[json!(["b", "c"])]);
//! ```

pub mod binding;
pub mod config;
pub mod controller;
pub mod method;
pub mod options;
pub mod registry;
pub mod render;

pub use binding::{Binding, EventResult};
pub use config::{ChangeCallback, ConfigError, ConfigOverrides, Options, WidgetConfig};
pub use controller::{Outcome, SelectList, Values};
pub use method::{Method, MethodError};
pub use options::{OptionSnapshot, SelectOption};
pub use registry::{Call, Dispatch, Registry};
pub use render::ItemState;
