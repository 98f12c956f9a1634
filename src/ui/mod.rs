//! Text views. Every function here is a pure rendering of current state.

pub mod chat;
pub mod forms;
pub mod results;

pub use chat::render_chat;
pub use forms::{render_clinical_form, render_ecg_upload};
pub use results::{confidence_bar, render_result};
