//! Workflow state machines.
//!
//! Each workflow owns its state and changes only through `update`, which
//! may hand back one effect for the [`App`](crate::App) to run. The effect's
//! outcome comes back in as another event.

pub mod chat;
pub mod clinical;
pub mod ecg;
pub mod notify;

pub use chat::{ChatEffect, ChatEvent, ChatSession};
pub use clinical::{ClinicalEffect, ClinicalEvent, ClinicalPhase, ClinicalWorkflow};
pub use ecg::{EcgEffect, EcgEvent, EcgPhase, EcgWorkflow};
pub use notify::{ConsoleNotifier, Level, Notification, Notifier};
