pub mod backends;

pub use backends::{FailingAsr, FailingDiarizer, RefusingAsr, RefusingDiarizer, ScriptedAsr, ScriptedDiarizer};
pub use test_app::TestApp;
