use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use hammer::harness::{CancelToken, DEFAULT_EXPECTED_BODY, DEFAULT_POOL_WORKERS};
use hammer::header::{synthetic_header, DEFAULT_HEADER_LEN, DEFAULT_HEADER_NAME};
use hammer::metrics::{start_metrics_server, MetricsConfig};
use hammer::report::run_banner;
use hammer::target::TargetServer;
use hammer::{LoadTest, LoadTestConfig, RunReport, Strategy};
use std::net::SocketAddr;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "hammer", version, about = "Hammer an HTTP endpoint with GET requests")]
struct Cli {
    /// Print the report as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Serve Prometheus metrics on this address while running
    #[arg(long, global = true, env = "HAMMER_METRICS_ADDR")]
    metrics_addr: Option<SocketAddr>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Hammer an existing endpoint
    Run(RunArgs),
    /// Start a local hello-world target and hammer it
    Demo(DemoArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Target URL, e.g. http://localhost:8080/abc
    #[arg(long, env = "HAMMER_URL")]
    url: String,

    #[arg(short = 'n', long, env = "HAMMER_REQUESTS", default_value_t = 40_000)]
    requests: u64,

    /// Tag printed with the report
    #[arg(long, env = "HAMMER_LABEL", default_value = "")]
    label: String,

    #[command(flatten)]
    strategy: StrategyArgs,

    #[command(flatten)]
    request: RequestArgs,
}

#[derive(Args, Debug)]
struct DemoArgs {
    #[arg(short = 'n', long, env = "HAMMER_REQUESTS", default_value_t = 40_000)]
    requests: u64,

    /// Path prefix the hello-world target answers on
    #[arg(long, default_value = "abc")]
    prefix: String,

    #[command(flatten)]
    strategy: StrategyArgs,

    #[command(flatten)]
    request: RequestArgs,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum StrategyKind {
    Sequential,
    Pool,
    Unbounded,
    RateLimited,
}

#[derive(Args, Debug)]
struct StrategyArgs {
    #[arg(long, value_enum, env = "HAMMER_STRATEGY", default_value_t = StrategyKind::Pool)]
    strategy: StrategyKind,

    /// Worker count for `pool` and `rate-limited`
    #[arg(long, env = "HAMMER_WORKERS", default_value_t = DEFAULT_POOL_WORKERS)]
    workers: usize,

    /// Ceiling on concurrent requests for `unbounded`
    #[arg(long, env = "HAMMER_MAX_IN_FLIGHT")]
    max_in_flight: Option<usize>,

    /// Requests per second for `rate-limited`
    #[arg(long, env = "HAMMER_RATE", default_value_t = 1_000)]
    rate: u32,
}

impl StrategyArgs {
    fn strategy(&self) -> Strategy {
        match self.strategy {
            StrategyKind::Sequential => Strategy::Sequential,
            StrategyKind::Pool => Strategy::BoundedPool {
                workers: self.workers,
            },
            StrategyKind::Unbounded => Strategy::Unbounded {
                max_in_flight: self.max_in_flight,
            },
            StrategyKind::RateLimited => Strategy::RateLimited {
                per_second: self.rate,
                workers: self.workers,
            },
        }
    }
}

#[derive(Args, Debug)]
struct RequestArgs {
    /// Header carrying the synthetic value
    #[arg(long, env = "HAMMER_HEADER_NAME", default_value = DEFAULT_HEADER_NAME)]
    header_name: String,

    /// Length of the synthetic header value in bytes
    #[arg(long, env = "HAMMER_HEADER_LEN", default_value_t = DEFAULT_HEADER_LEN)]
    header_len: usize,

    /// Body a 200 response must carry to count as a success
    #[arg(long, env = "HAMMER_EXPECTED_BODY", default_value = DEFAULT_EXPECTED_BODY)]
    expected_body: String,

    /// Accept any TLS certificate and hostname (self-signed test targets only)
    #[arg(long, env = "HAMMER_INSECURE")]
    insecure: bool,

    /// Per-request deadline in milliseconds, 0 to disable
    #[arg(long, env = "HAMMER_TIMEOUT_MS", default_value_t = 30_000)]
    timeout_ms: u64,

    /// Connect deadline in milliseconds, 0 to disable
    #[arg(long, env = "HAMMER_CONNECT_TIMEOUT_MS", default_value_t = 10_000)]
    connect_timeout_ms: u64,
}

impl RequestArgs {
    fn config(&self, url: String, requests: u64, label: String) -> LoadTestConfig {
        let millis = |ms: u64| (ms > 0).then(|| Duration::from_millis(ms));
        LoadTestConfig {
            target_url: url,
            total_requests: requests,
            label,
            header_name: self.header_name.clone(),
            header_value: synthetic_header(self.header_len),
            expected_body: self.expected_body.clone(),
            allow_self_signed_tls: self.insecure,
            request_timeout: millis(self.timeout_ms),
            connect_timeout: millis(self.connect_timeout_ms),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hammer=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Some(addr) = cli.metrics_addr {
        start_metrics_server(MetricsConfig::with_addr(addr))
            .context("failed to start metrics exporter")?;
    }

    let cancel = CancelToken::new();
    tokio::spawn(watch_interrupts(cancel.clone()));

    match cli.command {
        Command::Run(args) => {
            let config = args.request.config(args.url, args.requests, args.label);
            run_and_report(config, &args.strategy.strategy(), &cancel, cli.json).await?;
        }
        Command::Demo(args) => demo(args, &cancel, cli.json).await?,
    }

    Ok(())
}

/// Exit status for a run aborted by a second Ctrl-C (128 + SIGINT).
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// What a Ctrl-C does, given how many have arrived so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Interrupt {
    /// Stop dispatching and let in-flight requests finish.
    Drain,
    /// Give up on in-flight requests and exit now.
    Exit,
}

fn on_interrupt(count: u32, cancel: &CancelToken) -> Interrupt {
    cancel.cancel();
    if count <= 1 {
        Interrupt::Drain
    } else {
        Interrupt::Exit
    }
}

async fn watch_interrupts(cancel: CancelToken) {
    let mut count = 0u32;
    while tokio::signal::ctrl_c().await.is_ok() {
        count += 1;
        match on_interrupt(count, &cancel) {
            Interrupt::Drain => tracing::warn!(
                "interrupted, finishing requests already in flight (Ctrl-C again to exit now)"
            ),
            Interrupt::Exit => {
                tracing::warn!("interrupted again, exiting without waiting for in-flight requests");
                std::process::exit(INTERRUPTED_EXIT_CODE);
            }
        }
    }
}

async fn demo(args: DemoArgs, cancel: &CancelToken, json: bool) -> anyhow::Result<()> {
    println!("HEADER_VAL_LEN: {}", args.request.header_len);

    let server = TargetServer::hello(&args.prefix)
        .await
        .context("failed to start hello-world target")?;
    let url = server.url(&args.prefix);
    println!("HelloWorld server (internal network) at {url} (try it)");
    println!("===================================");

    let config = args
        .request
        .config(url, args.requests, "(uncranked & non SSL) ".to_string());
    run_and_report(config, &args.strategy.strategy(), cancel, json).await?;

    println!("Tests Finished");
    server.shutdown().await;
    Ok(())
}

async fn run_and_report(
    config: LoadTestConfig,
    strategy: &Strategy,
    cancel: &CancelToken,
    json: bool,
) -> anyhow::Result<RunReport> {
    let load_test = LoadTest::new(config)
        .context("invalid load test configuration")?
        .with_cancel_token(cancel.clone());

    if !json {
        println!(
            "{}",
            run_banner(&load_test.config().label, &load_test.config().target_url)
        );
    }

    let report = load_test.run(strategy).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }
    Ok(report)
}
