use anyhow::Result;
use ecotrace::*;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

const USAGE: &str = "usage: ecotrace [--json] <command> [args...]";

struct CliArgs {
    json: bool,
    command: String,
    args: Vec<String>,
}

enum Parsed {
    Run(CliArgs),
    Version,
    Help,
}

fn parse_args(mut argv: impl Iterator<Item = String>) -> Result<Parsed> {
    let mut json = false;
    loop {
        let Some(arg) = argv.next() else {
            anyhow::bail!("missing command\n{}", USAGE);
        };
        match arg.as_str() {
            "--json" => json = true,
            "-V" | "--version" => return Ok(Parsed::Version),
            "-h" | "--help" => return Ok(Parsed::Help),
            "--" => {
                let command = argv
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("missing command\n{}", USAGE))?;
                return Ok(Parsed::Run(CliArgs {
                    json,
                    command,
                    args: argv.collect(),
                }));
            }
            _ => {
                return Ok(Parsed::Run(CliArgs {
                    json,
                    command: arg,
                    args: argv.collect(),
                }));
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = match parse_args(std::env::args().skip(1))? {
        Parsed::Run(cli) => cli,
        Parsed::Version => {
            println!("{} {}", version::NAME, version::VERSION);
            return Ok(ExitCode::SUCCESS);
        }
        Parsed::Help => {
            println!("{}", USAGE);
            return Ok(ExitCode::SUCCESS);
        }
    };

    let config = EcoConfig::load()?;
    let source = SysinfoSource::new(Duration::from_millis(
        config.sampling.cpu_averaging_window_ms,
    ));
    let mut sampler = Sampler::new(source, &config);
    let calculator = FootprintCalculator::from_config(&config);

    let mut child = tokio::process::Command::new(&cli.command)
        .args(&cli.args)
        .spawn()
        .map_err(|e| anyhow::anyhow!("spawning {}: {}", cli.command, e))?;
    let tracked = track(&cli.command, &mut sampler, &calculator, child.wait()).await?;
    let status = tracked.output?;

    match tracked.report {
        Ok(report) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Environmental impact report for '{}':", cli.command);
                println!("{}", report);
                if report.is_high_impact(config.carbon.high_emissions_threshold_grams) {
                    println!("High emissions detected; consider optimizing this workload.");
                } else {
                    println!("Low environmental impact.");
                }
            }
        }
        Err(e) => eprintln!("No report available: {}", e),
    }

    let code = status.code().unwrap_or(1);
    Ok(ExitCode::from(u8::try_from(code).unwrap_or(1)))
}
