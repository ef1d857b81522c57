pub mod config;
pub mod error;
pub mod record;
pub mod registry;
pub mod render;
pub mod settings;
pub mod source;
pub mod uri;

pub use config::{RegistryConfig, RenderOptions, TimeZoneChoice};
pub use error::{FetchError, SettingsError, UriError};
pub use record::LogRecord;
pub use registry::LogStreamRegistry;
pub use settings::Settings;
pub use source::{Direction, FnPageSource, Page, PageRequest, PageSource, ScriptedPageSource, from_fn};
pub use uri::LogUri;
