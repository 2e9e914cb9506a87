//! Tether CLI
//!
//! Diff-scoped change attribution over pre-computed diff results.

use std::path::PathBuf;

use tetherc::commands::{analyze_case, parse_line, print_report, read_manifest, run_batch};
use tetherc::{init_tracing, BatchConfig, CliError};

fn fail(error: &CliError) -> ! {
    eprintln!("error: {error}");
    std::process::exit(1);
}

fn apply_option(config: &mut BatchConfig, arg: &str) {
    match config.apply_flag(arg) {
        Ok(true) => {}
        Ok(false) => {
            eprintln!("error: unknown option `{arg}`");
            eprintln!("Run `tether help` for the list of options.");
            std::process::exit(1);
        }
        Err(e) => fail(&CliError::from(e)),
    }
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "analyze" => {
            if args.len() < 3 {
                eprintln!("Usage: tether analyze <case.json> --line <N> [options]");
                std::process::exit(1);
            }

            // --line needs lookahead
            let mut config = BatchConfig::default();
            let mut case_path = None;
            let mut line = None;
            let mut i = 2;
            while i < args.len() {
                let arg = &args[i];
                if arg == "--line" && i + 1 < args.len() {
                    line = Some(args[i + 1].clone());
                    i += 2;
                    continue;
                }
                if let Some(value) = arg.strip_prefix("--line=") {
                    line = Some(value.to_string());
                } else if !arg.starts_with('-') && case_path.is_none() {
                    case_path = Some(PathBuf::from(arg));
                } else {
                    apply_option(&mut config, arg);
                }
                i += 1;
            }

            let (Some(path), Some(line)) = (case_path, line) else {
                eprintln!("error: missing case file or --line");
                eprintln!("Usage: tether analyze <case.json> --line <N> [options]");
                std::process::exit(1);
            };
            init_tracing(config.verbose);

            let line = parse_line(&line).unwrap_or_else(|e| fail(&e));
            match analyze_case(&path, line, &config) {
                Ok(report) => print_report(&path, &report),
                Err(e) => fail(&e),
            }
        }
        "batch" => {
            if args.len() < 3 {
                eprintln!("Usage: tether batch <manifest.csv> --cases <dir> [-o <out.csv>] [options]");
                std::process::exit(1);
            }

            // -o and --cases need lookahead
            let mut config = BatchConfig::default();
            let mut manifest = None;
            let mut cases = None;
            let mut output = None;
            let mut i = 2;
            while i < args.len() {
                let arg = &args[i];
                if arg == "-o" && i + 1 < args.len() {
                    output = Some(PathBuf::from(&args[i + 1]));
                    i += 2;
                    continue;
                }
                if arg == "--cases" && i + 1 < args.len() {
                    cases = Some(PathBuf::from(&args[i + 1]));
                    i += 2;
                    continue;
                }
                if let Some(dir) = arg.strip_prefix("--cases=") {
                    cases = Some(PathBuf::from(dir));
                } else if !arg.starts_with('-') && manifest.is_none() {
                    manifest = Some(PathBuf::from(arg));
                } else {
                    apply_option(&mut config, arg);
                }
                i += 1;
            }

            let Some(manifest) = manifest else {
                eprintln!("error: missing manifest path");
                std::process::exit(1);
            };
            // Cases default to the manifest's directory.
            let cases = cases.unwrap_or_else(|| {
                manifest
                    .parent()
                    .map(PathBuf::from)
                    .unwrap_or_default()
            });
            init_tracing(config.verbose);

            let entries = read_manifest(&manifest).unwrap_or_else(|e| fail(&e));
            let outcome = run_batch(&entries, &cases, &config);
            if let Err(e) = outcome.write_to(output.as_deref()) {
                fail(&e);
            }
            let failed = outcome.failures();
            if failed > 0 {
                eprintln!("{failed} of {} cases failed", outcome.rows.len());
            }
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" => {
            println!("Tether {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("Tether (diff-scoped change attribution)");
    println!();
    println!("Usage: tether <command> [options]");
    println!();
    println!("Commands:");
    println!("  analyze <case.json> --line <N>   Print the metrics for one target line");
    println!("  batch <manifest.csv>             Analyze every case in a manifest, write CSV");
    println!("  help                             Show this help message");
    println!("  version                          Show version information");
    println!();
    println!("Analysis options:");
    println!("  --tolerance=<N>     Lines before and after the target line (default: 10)");
    println!("  --before=<N>        Lines before the target line");
    println!("  --after=<N>         Lines after the target line");
    println!("  --no-scope          Do not restrict metrics to the enclosing function");
    println!("  --ignore-range      Accept every node regardless of the window");
    println!("  --legacy-scope      Use the historical scope containment check");
    println!("  --verbose, -v       Debug logging (TETHER_LOG overrides)");
    println!();
    println!("Batch options:");
    println!("  --cases <dir>       Directory holding <id>.json (default: manifest directory)");
    println!("  -o <path>           Output CSV (default: stdout)");
    println!("  --no-parallel       Analyze cases sequentially");
    println!();
    println!("Examples:");
    println!("  tether analyze cases/42.json --line 17");
    println!("  tether batch lines.csv --cases cases -o metrics.csv --tolerance=5");
}
