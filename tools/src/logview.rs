use crate::config::Config;
use crate::replay::{DEFAULT_PAGE_SIZE, FileReplaySource};
use log_registry::{
    Direction, FetchError, LogStreamRegistry, LogUri, RegistryConfig, RenderOptions, Settings,
    SettingsError, TimeZoneChoice, UriError,
};
use std::path::Path;
use thiserror::Error;

pub const SCHEME: &str = "logview";

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("settings: {0}")]
    Settings(#[from] SettingsError),
    #[error("cannot open log: {0}")]
    Io(#[from] std::io::Error),
    #[error("bad document name: {0}")]
    Uri(#[from] UriError),
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
}

pub fn uri_for(path: &Path) -> Result<LogUri, UriError> {
    LogUri::new(SCHEME, &path.display().to_string(), None)
}

// Merge the settings file and the command line; the command line wins.
fn registry_config(cfg: &Config, settings: &Settings) -> RegistryConfig {
    let mut config = RegistryConfig::from_settings(settings);
    if cfg.utc {
        config.time_zone = TimeZoneChoice::Utc;
    }
    if cfg.page_size.is_some() {
        config.page_limit = cfg.page_size;
    }
    config
}

/// Register the file, page it the requested number of times and return the
/// rendered document.
pub async fn render_document(cfg: &Config) -> Result<String, ToolError> {
    let settings = match &cfg.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::new(),
    };
    let timestamps = cfg.timestamps || settings.get("logs.timestamps", false);
    let config = registry_config(cfg, &settings);
    log::debug!("Registry config: {:?}", config);

    let source = FileReplaySource::open(&cfg.filename, DEFAULT_PAGE_SIZE)?;
    let uri = uri_for(&cfg.filename)?;

    let mut registry = LogStreamRegistry::new(config);
    let changes = registry.subscribe();
    registry.register_log(&uri, &source).await?;

    for _ in 0..cfg.head {
        registry.update_log(&uri, Direction::Head, &source).await?;
    }
    for _ in 0..cfg.tail {
        registry.update_log(&uri, Direction::Tail, &source).await?;
    }
    log::info!(
        "{} holds {} of {} records after {} growing updates",
        uri,
        registry.record_count(&uri).unwrap_or(0),
        source.len(),
        changes.try_iter().count()
    );

    let content = registry
        .get_log_content(&uri, RenderOptions { timestamps })
        .unwrap_or_default();
    registry.deregister_log(&uri);
    Ok(content)
}

pub async fn logview_cmd(cfg: Config) -> Result<(), ToolError> {
    let content = render_document(&cfg).await?;
    print!("{content}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    fn temp_file(text: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file
    }

    fn config(filename: PathBuf) -> Config {
        Config {
            filename,
            timestamps: false,
            utc: true,
            page_size: Some(2),
            head: 0,
            tail: 0,
            settings: None,
        }
    }

    #[tokio::test]
    async fn pages_from_the_end_then_backwards() {
        let log = temp_file("a\nb\nc\nd\ne\n");
        let mut cfg = config(log.path().to_path_buf());
        assert_eq!(render_document(&cfg).await.unwrap(), "d\ne\n");

        cfg.head = 1;
        assert_eq!(render_document(&cfg).await.unwrap(), "b\nc\nd\ne\n");

        cfg.head = 5;
        cfg.tail = 2;
        assert_eq!(render_document(&cfg).await.unwrap(), "a\nb\nc\nd\ne\n");
    }

    #[tokio::test]
    async fn oversized_page_size_reads_whole_file() {
        let log = temp_file("a\nb\nc\n");
        let mut cfg = config(log.path().to_path_buf());
        cfg.page_size = Some(usize::MAX);
        cfg.head = 1;
        cfg.tail = 1;
        assert_eq!(render_document(&cfg).await.unwrap(), "a\nb\nc\n");
    }

    #[tokio::test]
    async fn timestamps_from_settings_file() {
        let log = temp_file("1970-01-01T00:00:01 up\nplain\n");
        let settings = temp_file("[logs]\ntimestamps = true\npage_limit = 10\n");
        let mut cfg = config(log.path().to_path_buf());
        cfg.page_size = None;
        cfg.settings = Some(settings.path().to_path_buf());

        let pad = " ".repeat(29);
        assert_eq!(
            render_document(&cfg).await.unwrap(),
            format!("1970-01-01T00:00:01.000+00:00\t1970-01-01T00:00:01 up\n{pad}\tplain\n")
        );
    }

    #[tokio::test]
    async fn bad_settings_file() {
        let log = temp_file("a\n");
        let settings = temp_file("[logs\n");
        let mut cfg = config(log.path().to_path_buf());
        cfg.settings = Some(settings.path().to_path_buf());
        assert!(matches!(
            render_document(&cfg).await,
            Err(ToolError::Settings(SettingsError::Toml(_)))
        ));
    }

    #[tokio::test]
    async fn missing_file() {
        let cfg = config(PathBuf::from("/tmp/does_not_exist/app.log"));
        assert!(matches!(render_document(&cfg).await, Err(ToolError::Io(_))));
    }

    #[test]
    fn command_line_overrides_settings() {
        let settings = Settings::parse("logs.utc = false\nlogs.page_limit = 10").unwrap();
        let config = registry_config(&config(PathBuf::from("x.log")), &settings);
        assert_eq!(config.time_zone, TimeZoneChoice::Utc);
        assert_eq!(config.page_limit, Some(2));
    }
}
