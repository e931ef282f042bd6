//! State Module - toolkit-wide registries
//!
//! - **Focus** - focused element signal, field navigation, history
//! - **Dialogs** - live dialog list, show/hide
//! - **Functions** - name → callback table for callbacks bound by name
//! - **Handles** - name → element table fed by the `NAME` attribute

mod dialogs;
mod focus;
mod functions;
mod handles;

pub use dialogs::DialogList;
pub use focus::FocusState;
pub use functions::FunctionRegistry;
pub use handles::HandleRegistry;
