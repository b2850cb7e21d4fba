use std::env;
use std::path::PathBuf;

use fluview::{Client, ClientOptions, ParamValue, Query};

const USAGE: &str = "Usage:
  cargo run --example cli -- <table|lines|save> [options] [path]

Options:
  --sources <list>       data sources, e.g. ili,who           (default: ili)
  --seasons <list|all>   season ids, e.g. 60,61 or all        (default: all)
  --region <name|id>     hhs, census, national or 1..3        (default: national)
  --sub-regions <list>   ordinals or census division names    (default: 1)
  --json                 print the table as JSON (table only)

Example (Pacific and Mountain census divisions, every season):
  cargo run --example cli -- table --region census --sub-regions Pacific,Mountain

Set RUST_LOG=debug to see the request being sent. FLUVIEW_URL and
FLUVIEW_TIMEOUT_SECS override the endpoint and request timeout.";

struct Args {
    command: String,
    sources: String,
    seasons: String,
    region: String,
    sub_regions: String,
    json: bool,
    path: Option<PathBuf>,
}

fn parse_args(raw: &[String]) -> Result<Args, String> {
    let mut args = Args {
        command: raw.first().cloned().ok_or("missing command")?,
        sources: "ili".to_string(),
        seasons: "all".to_string(),
        region: "national".to_string(),
        sub_regions: "1".to_string(),
        json: false,
        path: None,
    };

    let mut it = raw.iter().skip(1);
    while let Some(a) = it.next() {
        let mut value = |name: &str| {
            it.next()
                .cloned()
                .ok_or_else(|| format!("{name} needs a value"))
        };
        match a.as_str() {
            "--sources" => args.sources = value("--sources")?,
            "--seasons" => args.seasons = value("--seasons")?,
            "--region" => args.region = value("--region")?,
            "--sub-regions" => args.sub_regions = value("--sub-regions")?,
            "--json" => args.json = true,
            other if other.starts_with("--") => return Err(format!("unknown option {other}")),
            other => args.path = Some(PathBuf::from(other)),
        }
    }
    Ok(args)
}

fn main() {
    env_logger::init();

    let raw: Vec<String> = env::args().skip(1).collect();
    if raw.is_empty() {
        eprintln!("{USAGE}");
        return;
    }

    let args = match parse_args(&raw) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("{e}\n\n{USAGE}");
            std::process::exit(2);
        }
    };

    let query = match Query::new(
        ParamValue::parse_auto(&args.sources),
        ParamValue::parse_auto(&args.seasons),
        ParamValue::parse_auto(&args.region),
        ParamValue::parse_auto(&args.sub_regions),
    ) {
        Ok(q) => q,
        Err(e) => {
            eprintln!("invalid query: {e}");
            std::process::exit(2);
        }
    };

    let client = match ClientOptions::from_env().and_then(Client::new) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("cannot create client: {e}");
            std::process::exit(2);
        }
    };

    let outcome = match args.command.as_str() {
        "table" => client.fetch_table(&query).map(|table| {
            if args.json {
                match serde_json::to_string_pretty(&table) {
                    Ok(s) => println!("{s}"),
                    Err(e) => eprintln!("cannot encode table: {e}"),
                }
            } else {
                println!("{} rows", table.len());
                println!("columns: {}", table.headers.join(" | "));
            }
        }),
        "lines" => client.fetch_lines(&query).map(|lines| {
            for line in lines {
                println!("{line}");
            }
        }),
        "save" => client
            .save_to_file(&query, args.path.as_deref())
            .map(|path| println!("saved {}", path.display())),
        other => {
            eprintln!("Unknown command {other}. Use: table|lines|save");
            std::process::exit(2);
        }
    };

    if let Err(e) = outcome {
        eprintln!("{} failed: {e}", args.command);
        eprintln!("Tip: the portal is occasionally down for maintenance; try again later or narrow the season list.");
        std::process::exit(1);
    }
}
