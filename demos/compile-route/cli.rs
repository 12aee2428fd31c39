use clap::Parser;
use route_calldata_compiler::config::{
    CHAIN_VAR, ENTRY_POINT_VAR, REVISION_VAR, SLIPPAGE_BPS_VAR,
};
use route_calldata_compiler::errors::Result;
use route_calldata_compiler::Revision;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Compile a route JSON file into route-processor calldata", long_about = None)]
pub struct Args {
    #[clap(long, env = "ROUTE_FILE", help = "Path to a route JSON file")]
    pub route: PathBuf,

    #[clap(long, env = "ROUTE_RECIPIENT", help = "Address receiving the route's final output")]
    pub recipient: String,

    #[clap(long, env = "ROUTE_REVISION", default_value = "v2", help = "Route-processor layout revision (v1, v2)")]
    pub revision: Revision,

    #[clap(long, env = "ROUTE_ENTRY_POINT", help = "Route-processor contract address")]
    pub entry_point: String,

    #[clap(long, env = "ROUTE_SLIPPAGE_BPS", default_value_t = 50, help = "Slippage tolerance in BPS applied to the minimum output")]
    pub slippage_bps: u64,

    #[clap(long, env = "ROUTE_CHAIN", default_value = "ethereum", help = "Target blockchain (e.g., ethereum, base)")]
    pub chain: String,
}

impl Args {
    /// Mirror parsed arguments into the environment so `CompilerConfig::from_env`
    /// sees the same values whether they came from flags or the shell.
    pub fn set_environment_variables(&self) {
        use std::env;

        tracing::debug!("Setting environment variables from CLI arguments");

        env::set_var(ENTRY_POINT_VAR, &self.entry_point);
        env::set_var(REVISION_VAR, self.revision.to_string());
        env::set_var(SLIPPAGE_BPS_VAR, self.slippage_bps.to_string());
        env::set_var(CHAIN_VAR, &self.chain);
    }
}

pub fn parse_cli_args() -> Result<Args> {
    let args = Args::parse();
    args.set_environment_variables();

    tracing::debug!(
        route = %args.route.display(),
        revision = %args.revision,
        chain = %args.chain,
        "Parsed CLI arguments"
    );

    Ok(args)
}
