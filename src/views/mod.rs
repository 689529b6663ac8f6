//! View Components
//!
//! ## Layout Structure
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  TitleBar: brand · nav links · notifications · user · ⚙     │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                             │
//! │   Content: Login | Register | Tasks (table + modals)        │
//! │                                                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod content;
mod login;
mod register;
mod task_form;
mod tasks;
mod title_bar;

pub use content::*;
pub use login::LoginView;
pub use register::*;
pub use task_form::*;
pub use tasks::*;
pub use title_bar::*;
