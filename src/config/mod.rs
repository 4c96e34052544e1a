mod filesystem;
mod loader;
mod model;

pub use filesystem::{APP_NAME, FileSystem, RealFileSystem};
pub use loader::{ConfigLoader, FileConfigLoader, LOCAL_CONFIG_NAME};
pub use model::{
    CacheConfig, ClassifierConfig, Config, DEFAULT_TOKEN_ENV, ExcludeConfig, LimitsConfig,
    ProviderConfig, ReportConfig,
};
