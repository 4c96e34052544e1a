use clap::Parser;

use repo_loc::cli::{Cli, Commands};
use repo_loc::commands::{run_cache, run_census, run_defaults, run_init, run_repo, run_user};
use repo_loc::logging;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    let exit_code = match &cli.command {
        Commands::User(args) => run_user(args, &cli),
        Commands::Repo(args) => run_repo(args, &cli),
        Commands::Defaults => run_defaults(),
        Commands::Init(args) => run_init(args),
        Commands::Cache(args) => run_cache(args, &cli),
        Commands::Census(args) => run_census(args),
    };

    std::process::exit(exit_code);
}
