//! HTML templates and styling for the popup.
//!
//! ## Module Structure
//!
//! - `styles` - CSS constants
//! - `script` - client-side glue calling the JSON API
//! - `components` - the popup page itself

mod components;
mod script;
mod styles;

pub use components::popup_html;
