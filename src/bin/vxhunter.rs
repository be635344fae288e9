use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use vxhunter::io::{load_image, IOLimits, DEFAULT_MAX_FILE_SIZE};
use vxhunter::logging::{filter_for_verbosity, init_tracing, LogFormat};
use vxhunter::{AnalysisConfig, AnalysisResult, Analyzer, Endianness, Outcome, VxVersion};

#[derive(Parser, Debug)]
#[command(name = "vxhunter")]
#[command(version)]
#[command(about = "Recover the symbol table and load address of a VxWorks image", long_about = None)]
struct Args {
    /// Raw firmware image
    firmware: PathBuf,

    /// VxWorks major version (5 or 6)
    #[arg(long = "vx", value_parser = parse_version)]
    vx_version: Option<VxVersion>,

    /// Byte order, skips detection (big|little)
    #[arg(long)]
    endian: Option<Endianness>,

    /// JSON analysis configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Extra candidate load address for the quick probe (repeatable)
    #[arg(long = "known-address", value_parser = parse_address)]
    known_addresses: Vec<u32>,

    /// Only run the known-address probe
    #[arg(long)]
    quick: bool,

    /// Scan for the symbol table on a single thread
    #[arg(long)]
    sequential: bool,

    /// Wall-clock budget for the nested searches
    #[arg(long)]
    time_budget_ms: Option<u64>,

    /// Refuse firmware files larger than this many bytes
    #[arg(long, default_value_t = DEFAULT_MAX_FILE_SIZE)]
    max_file_size: u64,

    /// Print the analysis as JSON
    #[arg(long)]
    json: bool,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,

    /// More log detail (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_version(s: &str) -> Result<VxVersion, String> {
    let major: u8 = s
        .trim_end_matches(".x")
        .parse()
        .map_err(|_| format!("invalid version '{}'", s))?;
    VxVersion::from_major(major).ok_or_else(|| format!("unsupported version '{}'", s))
}

fn parse_address(s: &str) -> Result<u32, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid address '{}': {}", s, e))
}

fn build_config(args: &Args) -> Result<AnalysisConfig> {
    let mut cfg = match &args.config {
        Some(path) => AnalysisConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    if let Some(version) = args.vx_version {
        cfg.version = version;
    }
    if args.endian.is_some() {
        cfg.endian = args.endian;
    }
    for addr in &args.known_addresses {
        if !cfg.known_addresses.contains(addr) {
            cfg.known_addresses.push(*addr);
        }
    }
    if args.sequential {
        cfg.parallel_scan = false;
    }
    if args.time_budget_ms.is_some() {
        cfg.time_budget_ms = args.time_budget_ms;
    }
    Ok(cfg)
}

fn print_summary(result: &AnalysisResult) {
    println!("VxWorks version:   {}", result.version);
    println!(
        "symbol table:      {:#x}..{:#x} ({} records)",
        result.symbol_table_range.start,
        result.symbol_table_range.end,
        result.symbol_count()
    );
    let kinds: Vec<String> = result
        .type_counts()
        .iter()
        .map(|(kind, n)| format!("{} {}", n, kind))
        .collect();
    println!("symbol types:      {}", kinds.join(", "));
    println!("endianness:        {}", result.endianness);
    match result.string_table_range {
        Some(range) => println!(
            "string table:      {:#x}..{:#x} ({} names)",
            range.start,
            range.end,
            result.string_table.len()
        ),
        None => println!("string table:      not found"),
    }
    match (result.load_address, result.load_address_source) {
        (Some(addr), Some(source)) => println!("load address:      {:#x} ({:?})", addr, source),
        (Some(addr), None) => println!("load address:      {:#x}", addr),
        (None, _) => println!("load address:      not found"),
    }
}

fn run(args: &Args) -> Result<bool> {
    let cfg = build_config(args)?;
    let analyzer = Analyzer::new(cfg).context("invalid configuration")?;
    let limits = IOLimits {
        max_file_size: args.max_file_size,
    };
    let image = load_image(&args.firmware, &limits)
        .with_context(|| format!("loading {}", args.firmware.display()))?;
    debug!(size = image.len(), "firmware loaded");

    if args.quick {
        let candidates = analyzer.config().known_addresses.clone();
        let found = analyzer.quick_probe(image.as_bytes(), &candidates)?.found();
        match (found, args.json) {
            (Some(addr), true) => println!("{}", serde_json::json!({ "load_address": addr })),
            (Some(addr), false) => println!("load address: {:#x}", addr),
            (None, true) => println!("{}", serde_json::json!({ "load_address": null })),
            (None, false) => eprintln!("no known load address matches"),
        }
        return Ok(found.is_some());
    }

    let result = match analyzer.analyze(image.as_bytes())? {
        Outcome::Found(result) => result,
        Outcome::NotFound => {
            if args.json {
                println!("{}", serde_json::json!({ "symbol_table": null }));
            } else {
                eprintln!("Can't find symbols in binary");
            }
            return Ok(false);
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_summary(&result);
    }
    if result.load_address.is_none() {
        if !args.json {
            eprintln!("We didn't find load address in this firmware, sorry!");
        }
        return Ok(false);
    }
    Ok(true)
}

fn main() -> ExitCode {
    let args = Args::parse();
    let format = if args.log_json {
        LogFormat::Json
    } else {
        LogFormat::Text
    };
    init_tracing(format, filter_for_verbosity(args.verbose));

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(1)
        }
    }
}
