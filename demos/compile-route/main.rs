pub mod cli;

use anyhow::Context;
use route_calldata_compiler::route::{CompiledRouteDto, MultiRoute, RouteDto};
use route_calldata_compiler::utils::string_to_h160;
use route_calldata_compiler::{CompilerConfig, RouteCompiler};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("compile_route=info".parse()?)
                .add_directive("route_calldata_compiler=info".parse()?),
        )
        .compact()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse_cli_args()?;
    let config = CompilerConfig::from_env()?;
    let recipient = string_to_h160(&args.recipient)?;

    let raw = std::fs::read_to_string(&args.route)
        .with_context(|| format!("failed to read route file {}", args.route.display()))?;
    let dto: RouteDto = serde_json::from_str(&raw).context("route file is not a valid route")?;
    let route = MultiRoute::try_from(&dto)?;

    tracing::info!(
        legs = route.legs.len(),
        status = ?route.status,
        token_in = %route.token_in,
        token_out = %route.token_out,
        "Loaded route"
    );

    let compiler = RouteCompiler::from_config(&config)?;
    let compiled = compiler.compile(&route, config.revision, recipient)?;

    println!(
        "{}",
        serde_json::to_string_pretty(&CompiledRouteDto::from(&compiled))?
    );
    Ok(())
}
