//! badgesmith CLI
//!
//! Entry point for the `badgesmith` command-line tool: inspect default
//! settings documents, lint persisted ones, and run a full engine load
//! against a directory-backed store.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use badgesmith::{catalog, keys, merge, sync};
use badgesmith::{Domain, FileStore, SettingsSession};

#[derive(Parser)]
#[command(name = "badgesmith")]
#[command(about = "Settings engine for media poster badges", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the default settings document for a domain
    Defaults {
        /// Settings domain (review, resolution)
        domain: String,

        /// Output on a single line instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },

    /// Lint a persisted settings document
    Verify {
        /// Path to the document (JSON)
        file: PathBuf,

        /// Settings domain (review, resolution)
        #[arg(long, short = 'd')]
        domain: String,

        /// Output findings in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Load a settings directory through the engine and show the result
    Show {
        /// Directory holding <resource>.json files
        #[arg(long)]
        dir: PathBuf,

        /// Settings domain (review, resolution)
        #[arg(long, short = 'd')]
        domain: String,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "badgesmith=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Defaults { domain, compact } => {
            run_defaults(&domain, compact);
        }
        Commands::Verify { file, domain, json } => {
            run_verify(&file, &domain, json);
        }
        Commands::Show { dir, domain, json } => {
            run_show(dir, &domain, json);
        }
    }
}

fn parse_domain(value: &str) -> Domain {
    match Domain::parse(value) {
        Some(domain) => domain,
        None => {
            eprintln!("Unknown domain '{value}' (expected: review, resolution)");
            process::exit(2);
        }
    }
}

fn print_value(value: &serde_json::Value, compact: bool) {
    let rendered = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    match rendered {
        Ok(text) => println!("{text}"),
        Err(err) => {
            eprintln!("Error serializing output: {err}");
            process::exit(1);
        }
    }
}

fn run_defaults(domain: &str, compact: bool) {
    let domain = parse_domain(domain);
    print_value(&catalog::defaults(domain), compact);
}

fn run_verify(file: &PathBuf, domain: &str, json: bool) {
    let domain = parse_domain(domain);

    let mut findings: Vec<String> = Vec::new();

    let parsed = match std::fs::read_to_string(file) {
        Ok(text) => match serde_json::from_str::<serde_json::Value>(&text) {
            Ok(value) => Some(value),
            Err(err) => {
                findings.push(format!("document does not parse as JSON: {err}"));
                None
            }
        },
        Err(err) => {
            eprintln!("Error reading {}: {err}", file.display());
            process::exit(1);
        }
    };

    let outcome = merge::merge_with_defaults(parsed, domain);
    if let Some(warning) = &outcome.warning {
        findings.push(warning.to_string());
    }

    let sources = catalog::default_sources(domain);

    // Enable keys nobody derives any more.
    let known_enable: Vec<String> = sources.iter().map(|s| keys::enable_key(&s.name)).collect();
    if let Some(map) = outcome.document.as_object() {
        for key in map.keys() {
            if key.starts_with(keys::ENABLE_KEY_PREFIX) && !known_enable.contains(key) {
                findings.push(format!("stale enable key '{key}' matches no catalog source"));
            }
        }
    }

    // Ordering entries nobody derives any more.
    let known_lookup: Vec<String> = sources.iter().map(|s| keys::lookup_key(&s.name)).collect();
    if let Some(order) = outcome.document[sync::PRIORITY_ORDER_KEY].as_array() {
        for entry in order.iter().filter_map(serde_json::Value::as_str) {
            if !known_lookup.iter().any(|k| k == entry) {
                findings.push(format!(
                    "priorityOrder entry '{entry}' matches no catalog source"
                ));
            }
        }
    }

    // Authoring check: two catalog names deriving the same key.
    for (i, a) in sources.iter().enumerate() {
        for b in &sources[i + 1..] {
            if keys::enable_key(&a.name) == keys::enable_key(&b.name) {
                findings.push(format!(
                    "enable key collision between '{}' and '{}'",
                    a.name, b.name
                ));
            }
            if keys::lookup_key(&a.name) == keys::lookup_key(&b.name) {
                findings.push(format!(
                    "lookup key collision between '{}' and '{}'",
                    a.name, b.name
                ));
            }
        }
    }

    if json {
        print_value(&serde_json::json!({ "file": file.display().to_string(), "findings": findings }), false);
    } else if findings.is_empty() {
        println!("Document ok: {}", file.display());
    } else {
        println!("Findings for {}:", file.display());
        for finding in &findings {
            println!("  - {finding}");
        }
    }

    if !findings.is_empty() {
        process::exit(1);
    }
}

fn run_show(dir: PathBuf, domain: &str, json: bool) {
    let domain = parse_domain(domain);
    let mut session = SettingsSession::new(FileStore::new(dir), domain);
    let report = session.load();

    if json {
        let sources = match serde_json::to_value(session.sources()) {
            Ok(value) => value,
            Err(err) => {
                eprintln!("Error serializing output: {err}");
                process::exit(1);
            }
        };
        print_value(
            &serde_json::json!({
                "domain": domain.as_str(),
                "digest": report.digest,
                "clean": report.is_clean(),
                "sources": sources,
                "tuning": serde_json::to_value(session.tuning()).unwrap_or_default(),
            }),
            false,
        );
        return;
    }

    println!("Domain: {domain}");
    println!("Document digest: {}", report.digest);
    if let Some(notice) = &report.notice {
        println!("Notice: {notice}");
    }
    if let Some(notice) = &report.tuning_notice {
        println!("Notice: {notice}");
    }
    println!();
    println!("  {:<4} {:<26} {:<8} {:<9} variants", "id", "name", "enabled", "priority");
    for source in session.sources() {
        println!(
            "  {:<4} {:<26} {:<8} {:<9} {}",
            source.id, source.name, source.enabled, source.priority, source.max_variants
        );
    }
    println!();
    let tuning = session.tuning();
    println!("Tuning: max_badges={} selection_mode={:?} percentage_only={} group_related={} anime_only={}",
        tuning.max_badges,
        tuning.selection_mode,
        tuning.percentage_only,
        tuning.group_related,
        tuning.anime_only,
    );
}
