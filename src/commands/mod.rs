pub mod analyze;
pub mod cache;
pub mod census;
pub mod context;
pub mod defaults;
pub mod init;

pub use analyze::{analyze_repository, analyze_user, run_repo, run_user, write_output};
pub use cache::{clear_cache, run_cache};
pub use census::{format_census, run_census};
pub use context::{apply_run_overrides, branch_cache, build_analyzer, http_client, load_config};
pub use defaults::{format_defaults, run_defaults};
pub use init::{generate_config_template, run_init, run_init_impl};
