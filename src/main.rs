use anyhow::Context;
use clap::{Arg, Command};
use log::LevelFilter;
use phishscan::{scan_batch, BatchItem, RuleSet, RuleSetConfig, ScoringEngine, Verdict};
use std::io::Read;
use std::process;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() {
    let matches = Command::new("phishscan")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Heuristic URL phishing triage")
        .long_about(
            "Scores URLs against a rule database of known phishing domains, \
             typosquatting patterns, phishing keywords, suspicious TLDs and brand \
             impersonation, and recommends SAFE, CAUTION or BLOCK.",
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Rule database (YAML or JSON)")
                .default_value("/etc/phishscan.yaml"),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .value_name("FILE")
                .help("Write the built-in rule database to FILE")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("test-config")
                .long("test-config")
                .help("Validate the rule database and exit")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("url")
                .short('u')
                .long("url")
                .value_name("URL")
                .help("URL to analyze (repeatable)")
                .action(clap::ArgAction::Append),
        )
        .arg(
            Arg::new("bulk")
                .short('b')
                .long("bulk")
                .value_name("FILE")
                .help("Analyze one URL per line from FILE ('-' for stdin)")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .value_name("SECS")
                .help("Deadline for a bulk run")
                .value_parser(clap::value_parser!(u64))
                .default_value("30"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print results as JSON")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("health")
                .long("health")
                .help("Print service health and exit")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable debug logging of every rule that fires")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let log_level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    if matches.get_flag("health") {
        match serde_json::to_string(&phishscan::service::health()) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error rendering health status: {e}");
                process::exit(1);
            }
        }
        return;
    }

    if let Some(generate_path) = matches.get_one::<String>("generate-config") {
        generate_default_config(generate_path);
        return;
    }

    let config_path = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or("/etc/phishscan.yaml");

    let rules = match load_rules(config_path) {
        Ok(rules) => rules,
        Err(e) => {
            eprintln!("Error loading rule database: {e:#}");
            process::exit(1);
        }
    };

    if matches.get_flag("test-config") {
        println!("🔍 Testing rule database...");
        println!("Indicators loaded: {}", rules.indicator_count());
        println!(
            "Thresholds: HIGH_RISK >= {}, MEDIUM_RISK >= {}",
            rules.high_risk_threshold(),
            rules.medium_risk_threshold()
        );
        println!("✅ Rule database is valid");
        return;
    }

    let engine = Arc::new(ScoringEngine::new(Arc::new(rules)));
    let json = matches.get_flag("json");

    if let Some(bulk_path) = matches.get_one::<String>("bulk") {
        let urls = match read_url_list(bulk_path) {
            Ok(urls) => urls,
            Err(e) => {
                eprintln!("Error reading URL list: {e:#}");
                process::exit(1);
            }
        };
        let timeout = Duration::from_secs(*matches.get_one::<u64>("timeout").unwrap_or(&30));

        log::info!("Analyzing {} URLs", urls.len());
        let items = scan_batch(engine, urls, timeout).await;
        if json {
            print_json(&serde_json::json!({ "analysis_results": items }));
        } else {
            for item in &items {
                print_item(item);
            }
        }
        return;
    }

    let urls: Vec<&String> = matches
        .get_many::<String>("url")
        .map(|values| values.collect())
        .unwrap_or_default();

    if urls.is_empty() {
        eprintln!("Nothing to analyze: pass --url URL or --bulk FILE");
        process::exit(2);
    }

    let mut rejected = false;
    for url in urls {
        match engine.assess(url) {
            Ok(verdict) if json => print_json(&verdict),
            Ok(verdict) => print_verdict(&verdict),
            Err(e) => {
                rejected = true;
                if json {
                    print_json(&serde_json::json!({ "error": e.to_string() }));
                } else {
                    eprintln!("❌ {e}");
                }
            }
        }
    }

    if rejected {
        process::exit(2);
    }
}

fn load_rules(path: &str) -> anyhow::Result<RuleSet> {
    if std::path::Path::new(path).exists() {
        RuleSet::load(path).with_context(|| format!("Failed to load rule database: {path}"))
    } else {
        log::warn!("Rule database '{path}' not found, using built-in rules");
        RuleSet::from_config(&RuleSetConfig::builtin()).context("Built-in rule database is invalid")
    }
}

fn read_url_list(path: &str) -> anyhow::Result<Vec<String>> {
    let content = if path == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read URLs from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))?
    };

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

fn generate_default_config(path: &str) {
    match RuleSetConfig::builtin().to_file(path) {
        Ok(()) => {
            println!("Default rule database written to: {path}");
            println!("Please edit the indicator lists to suit your needs.");
        }
        Err(e) => {
            eprintln!("Error writing rule database: {e}");
            process::exit(1);
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to render JSON: {e}"),
    }
}

fn print_item(item: &BatchItem) {
    match item {
        BatchItem::Scanned(verdict) => print_verdict(verdict),
        BatchItem::Failed { url, error } => {
            println!("❌ {url}");
            println!("   Error: {error}");
            println!();
        }
    }
}

fn print_verdict(verdict: &Verdict) {
    let icon = match verdict.recommendation {
        phishscan::Recommendation::Block => "🚨",
        phishscan::Recommendation::Caution => "⚠️ ",
        phishscan::Recommendation::Safe => "✅",
    };
    println!("{icon} {}", verdict.url);
    println!(
        "   Score: {}  Level: {}  Recommendation: {}",
        verdict.score, verdict.tier, verdict.recommendation
    );
    for threat in &verdict.threats {
        println!("     - {}", threat.description);
    }
    println!();
}
