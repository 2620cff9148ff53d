//! Built-in leaf tasks
//!
//! These are external collaborators to the engine core: each one receives
//! already-resolved parameters and writes one result back. They double as
//! examples of the task plugin contract.

pub mod console_write;
pub mod fn_task;
pub mod raise_error;
pub mod render_template;
pub mod set_value;

pub use console_write::{ConsoleWrite, ConsoleWriteParams};
pub use fn_task::FnTask;
pub use raise_error::{RaiseError, RaiseErrorParams};
pub use render_template::{RenderTemplate, RenderTemplateParams};
pub use set_value::{SetValue, SetValueParams};
