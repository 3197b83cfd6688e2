// Constants module for shared string constants

/// Trove classifier selecting prebuilt JupyterLab extensions.
pub const PREBUILT_CLASSIFIER: &str = "Framework :: Jupyter :: JupyterLab :: Extensions :: Prebuilt";

pub const DEFAULT_BASE_URL: &str = "https://pypi.org/pypi";
pub const DEFAULT_STATS_URL: &str =
    "https://pypistats.org/api/packages/{package}/recent?period=month";
pub const STATS_URL_PLACEHOLDER: &str = "{package}";
pub const DEFAULT_THROTTLING: f64 = 1.0;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const CONFIG_FILE: &str = "labext-catalog.toml";
pub const CATALOG_FILE: &str = "pypi-jlab-extensions.json";

/// Package type tag carried by every catalog entry.
pub const PKG_TYPE: &str = "prebuilt";
