use std::path::Path;
use std::sync::Arc;

use moketravel::config::{config_from_str, ConfigV1};
use moketravel::context::SessionState;
use moketravel::startup::start;
use moketravel::state::AppState;

/// Configuration pointing at a mock API and a storage file.
pub fn test_config(api_url: &str, storage: &Path) -> ConfigV1 {
    let yaml = format!(
        r#"
version: "1.0.0"
api:
  base_url: "{}"
  timeout_in_ms: 3000
store:
  type: file
  path: "{}"
logging:
  level: debug
  format: json
"#,
        api_url,
        storage.display()
    );
    config_from_str(&yaml).expect("test config should parse")
}

/// Start the application the way the binary does, session bootstrap included.
pub fn start_app(api_url: &str, storage: &Path) -> (AppState, SessionState) {
    start(Arc::new(test_config(api_url, storage))).expect("app should start")
}
