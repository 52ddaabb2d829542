mod common;
pub mod settings;
pub mod setup;
pub mod status;
pub mod studio;
pub mod switch;
pub mod sync;
pub mod watch;

pub use common::AppContext;
use common::{report_skipped, session_log};
pub use settings::Settings;
pub use setup::Setup;
pub use status::Status;
pub use studio::Studio;
pub use switch::Switch;
pub use sync::Sync;
pub use watch::Watch;
