pub mod ai;
pub mod recommendations;
pub mod report;
pub mod upload;

pub use ai::{ChatClient, ChatService, ClinicalClient, ClinicalPredictor, EcgClient, EcgPredictor};
pub use recommendations::{Assessment, RecommendationBundle, Severity};
pub use report::Report;
pub use upload::{EcgImage, SelectedFile};
