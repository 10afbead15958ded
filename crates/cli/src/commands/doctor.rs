//! Doctor command - validate configuration and show status

use anyhow::Result;
use product_recs_adapters::catalog::FsCatalogSource;
use product_recs_domain::{Catalog, CatalogSource, ComplementarityMap};
use serde::Serialize;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

use super::recommend::build_generator;
use crate::args::DoctorArgs;
use crate::config::AppConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
enum Status {
    Ok,
    Warn,
    Error,
}

impl Status {
    fn symbol(self) -> &'static str {
        match self {
            Status::Ok => "✓",
            Status::Warn => "⚠",
            Status::Error => "✗",
        }
    }
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    config: CheckResult,
    catalog: CheckResult,
    complements: CheckResult,
    llm: CheckResult,
    server: CheckResult,
    overall: Status,
}

#[derive(Debug, Serialize)]
struct CheckResult {
    status: Status,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl CheckResult {
    fn new(status: Status, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
        }
    }

    fn ok(message: impl Into<String>) -> Self {
        Self::new(Status::Ok, message)
    }

    fn warn(message: impl Into<String>) -> Self {
        Self::new(Status::Warn, message)
    }

    fn error(message: impl Into<String>) -> Self {
        Self::new(Status::Error, message)
    }

    fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

pub async fn execute(args: DoctorArgs, config_path: Option<PathBuf>) -> Result<()> {
    let skipped = || CheckResult::warn("Skipped: configuration did not load");

    let mut report = match AppConfig::load(config_path.as_deref()) {
        Ok(config) => {
            let (catalog, loaded) = check_catalog(&config.catalog.path).await;
            let complements = match loaded {
                Some(ref catalog) => check_complements(catalog),
                None => CheckResult::warn("Skipped: catalog did not load"),
            };
            DoctorReport {
                config: CheckResult::ok("Configuration loaded successfully"),
                catalog,
                complements,
                llm: check_llm(&config),
                server: check_server(&config),
                overall: Status::Ok,
            }
        }
        Err(e) => DoctorReport {
            config: CheckResult::error(format!("Failed to load config: {:#}", e)),
            catalog: skipped(),
            complements: skipped(),
            llm: skipped(),
            server: skipped(),
            overall: Status::Error,
        },
    };

    report.overall = [
        &report.config,
        &report.catalog,
        &report.complements,
        &report.llm,
        &report.server,
    ]
    .iter()
    .map(|c| c.status)
    .max()
    .unwrap_or(Status::Ok);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if report.overall == Status::Error {
        anyhow::bail!("Doctor found configuration errors");
    }

    Ok(())
}

async fn check_catalog(path: &Path) -> (CheckResult, Option<Catalog>) {
    match FsCatalogSource::new(path).load().await {
        Ok(products) if products.is_empty() => (
            CheckResult::warn(format!("Catalog {} is empty", path.display())),
            Some(Catalog::empty()),
        ),
        Ok(products) => {
            let catalog = Catalog::new(products);
            let result = CheckResult::ok(format!(
                "{} products in {} categories",
                catalog.len(),
                catalog.categories().len()
            ))
            .with_details(serde_json::json!({
                "path": path.display().to_string(),
                "fingerprint": catalog.fingerprint(),
                "categories": catalog.categories(),
            }));
            (result, Some(catalog))
        }
        Err(e) => (
            CheckResult::error(format!("Failed to load catalog: {}", e)),
            None,
        ),
    }
}

fn check_complements(catalog: &Catalog) -> CheckResult {
    let report = ComplementarityMap::standard().validate(catalog.categories());

    if report.unmapped.is_empty() {
        CheckResult::ok("Every catalog category has complementary pairings")
    } else {
        CheckResult::warn(format!(
            "Categories without pairings: {}",
            report.unmapped.join(", ")
        ))
    }
    .with_details(serde_json::json!({
        "unmapped": report.unmapped,
        "absent": report.absent,
    }))
}

fn check_llm(config: &AppConfig) -> CheckResult {
    let llm = &config.llm;

    if llm.use_mock {
        return CheckResult::ok("Mock mode: deterministic selector only");
    }

    match build_generator(config) {
        Ok(Some(generator)) => CheckResult::ok(format!(
            "Provider: {}, Model: {}, timeout: {}s",
            generator.name(),
            llm.model,
            llm.timeout_secs
        )),
        Ok(None) => CheckResult::ok("Mock mode: deterministic selector only"),
        Err(e) => CheckResult::warn(format!(
            "Provider {} unavailable, requests will use the deterministic selector: {:#}",
            llm.provider, e
        )),
    }
}

fn check_server(config: &AppConfig) -> CheckResult {
    let server = &config.server;

    if server.port == 0 {
        return CheckResult::warn("Port 0 binds a random port");
    }

    match server.bind_address.parse::<IpAddr>() {
        Ok(_) => CheckResult::ok(format!(
            "Listening on {}:{}",
            server.bind_address, server.port
        )),
        Err(_) => CheckResult::warn(format!(
            "Bind address {} is not an IP address and will need DNS resolution",
            server.bind_address
        )),
    }
}

fn print_report(report: &DoctorReport) {
    println!("product-recs Doctor Report");
    println!("==========================");
    println!();

    print_check("Config", &report.config);
    print_check("Catalog", &report.catalog);
    print_check("Complements", &report.complements);
    print_check("LLM Generator", &report.llm);
    print_check("Server", &report.server);

    println!();
    println!(
        "{} Overall: {}",
        report.overall.symbol(),
        format!("{:?}", report.overall).to_uppercase()
    );

    if report.overall == Status::Ok {
        println!();
        println!("Ready to serve! Try: product-recs serve");
    }
}

fn print_check(name: &str, result: &CheckResult) {
    println!("{} {}: {}", result.status.symbol(), name, result.message);
}
