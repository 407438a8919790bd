//! E2E test harness entry point
//!
//! Runs the Address Book suite against a WebDriver server.
//! Run with: cargo run --package addressbook-e2e -- --help

use std::path::PathBuf;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use addressbook_e2e::config::RunnerConfig;
use addressbook_e2e::driver::{probe_target, DriverConfig, DriverHandle};
use addressbook_e2e::session::{Browser, WebDriverSessions};
use addressbook_e2e::{E2eError, E2eResult, TestRunner, TestSuite, TestSuiteResult};

#[derive(Parser, Debug)]
#[command(name = "addressbook-e2e")]
#[command(about = "E2E test runner for the Address Book application")]
struct Args {
    /// YAML runner configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL of the Address Book application
    #[arg(long)]
    base_url: Option<String>,

    /// WebDriver server URL
    #[arg(long)]
    webdriver_url: Option<String>,

    /// Spawn this driver binary (chromedriver, geckodriver) instead of
    /// connecting to --webdriver-url
    #[arg(long)]
    driver_binary: Option<PathBuf>,

    /// Browser to use (chrome, firefox)
    #[arg(long)]
    browser: Option<Browser>,

    /// Show the browser window
    #[arg(long)]
    headed: bool,

    /// Directory of YAML suites (built-in suite when omitted)
    #[arg(short, long)]
    suites: Option<PathBuf>,

    /// Run only cases carrying this tag
    #[arg(short, long)]
    tag: Option<String>,

    /// Run only cases whose name contains this text
    #[arg(short, long)]
    name: Option<String>,

    /// Directory for teardown screenshots
    #[arg(long)]
    screenshot_dir: Option<PathBuf>,

    /// Output directory for results
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to create tokio runtime: {}", e);
            std::process::exit(2);
        }
    };

    match rt.block_on(async_main(args)) {
        Ok(true) => std::process::exit(0),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}

fn load_config(args: &Args) -> E2eResult<RunnerConfig> {
    let mut config = match &args.config {
        Some(path) => RunnerConfig::from_file(path)?,
        None => RunnerConfig::default(),
    };
    config.apply_env();

    if let Some(url) = &args.base_url {
        config.target.base_url = url.clone();
    }
    if let Some(url) = &args.webdriver_url {
        config.session.webdriver_url = url.clone();
    }
    if let Some(binary) = &args.driver_binary {
        config.driver = Some(DriverConfig {
            binary_path: binary.clone(),
            ..config.driver.take().unwrap_or_default()
        });
    }
    if let Some(browser) = args.browser {
        config.session.browser = browser;
    }
    if args.headed {
        config.session.headless = false;
    }
    if let Some(dir) = &args.suites {
        config.suites_dir = Some(dir.clone());
    }
    if let Some(dir) = &args.screenshot_dir {
        config.session.screenshot_dir = dir.clone();
    }
    if let Some(dir) = &args.output {
        config.output_dir = dir.clone();
    }

    config.validate()?;
    Ok(config)
}

async fn async_main(args: Args) -> E2eResult<bool> {
    let mut config = load_config(&args)?;

    // Kept alive until the suite finishes; dropping it stops the driver
    let _driver = match config.driver.clone() {
        Some(driver_config) => {
            let handle = DriverHandle::spawn(driver_config).await?;
            config.session.webdriver_url = handle.url().to_string();
            Some(handle)
        }
        None => None,
    };

    probe_target(&config.target.base_url).await;

    let mut suites = match &config.suites_dir {
        Some(dir) => TestSuite::load_all(dir)?,
        None => vec![TestSuite::builtin()?],
    };
    if let Some(tag) = &args.tag {
        suites = suites.into_iter().map(|s| s.filter_by_tag(tag)).collect();
    }
    if let Some(name) = &args.name {
        suites = suites.into_iter().map(|s| s.filter_by_name(name)).collect();
    }

    let selected: usize = suites.iter().map(|s| s.cases.len()).sum();
    if selected == 0 {
        return Err(E2eError::SpecParse("no test cases selected".to_string()));
    }

    let sessions = WebDriverSessions::new(
        config.session.clone(),
        config.selectors.clone(),
        config.target.base_url.clone(),
    );
    let runner = TestRunner::new(sessions, config.output_dir.clone());

    let mut parts = Vec::with_capacity(suites.len());
    for suite in &suites {
        parts.push(runner.run_suite(suite).await);
    }
    let results = TestSuiteResult::merge("addressbook-e2e", parts);

    info!(
        "Total: {} passed, {} failed of {}",
        results.passed, results.failed, results.total
    );
    runner.write_results(&results)?;

    Ok(results.all_passed())
}
