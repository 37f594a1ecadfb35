pub mod document;
pub mod element;
pub mod event;
pub mod html;
pub mod selector;

pub use document::{Dom, NodeId};
pub use element::Element;
pub use event::{Event, EventKind, EventResult, Handler};
pub use selector::Selector;
