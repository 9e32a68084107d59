//! tai command line
//!
//! Commands:
//! - format FORMAT [STAMP]: render STAMP (default now) in local time
//! - decompose STAMP [OFFSET|local]: print the civil record as JSON
//! - compose RECORD: print the timestamp of a JSON civil record
//!
//! Without arguments, reads one JSON request per line from stdin and writes
//! one JSON response per line to stdout:
//!
//! ```text
//! {"op":"format","format":"%F %T","input":1688474096}
//! {"op":"decompose","stamp":1688474096,"offset":"local"}
//! {"op":"compose","fields":{"year":2023,"month":7,"day":4,"hour":0,"minute":0,"second":0}}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use std::env;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use tai::{codes, AtomicTime, CivilFields, OffsetMode, RenderInput, Tai, TaiError};
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const USAGE: &str = "\
usage: tai format FORMAT [STAMP]
       tai decompose STAMP [OFFSET|local]
       tai compose RECORD
       tai                      (JSON-lines requests on stdin)

FORMAT directives:
  %a %A %b %B %c %p %P %x %X   locale names and layouts
  %C %d %e %H %I %j %k %l %m   numeric fields
  %M %S %u %w %y %Y %s
  %g %G %V                     ISO-8601 week-based year and week
  %U %W                        Sunday/Monday based week of the year
  %z %Z                        UTC offset, zone name
  %D %F %r %R %T %+            composites
  %n %t %%                     newline, tab, percent

OFFSET is in seconds west of UTC (-3600 is UTC+01:00).
RUST_LOG sets the log level (default: warn).";

// Request/response types
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
enum Request {
    Format {
        format: String,
        #[serde(default)]
        input: Option<RenderInput>,
    },
    Decompose {
        stamp: f64,
        #[serde(default)]
        offset: Option<OffsetArg>,
    },
    Compose {
        fields: CivilFields,
    },
}

/// An offset as written in a request: seconds or `"local"`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OffsetArg {
    Seconds(i32),
    Named(String),
}

impl OffsetArg {
    fn mode(&self) -> Result<OffsetMode, TaiError> {
        match self {
            OffsetArg::Seconds(offset) => Ok(OffsetMode::Fixed(*offset)),
            OffsetArg::Named(name) => name.parse(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
enum Response {
    Ok(JsonValue),
    Error(TaiError),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let tai = Tai::new();

    let result = match args.first().map(String::as_str) {
        None => return serve(&tai),
        Some("-h") | Some("--help") | Some("help") => {
            println!("{}", USAGE);
            return ExitCode::SUCCESS;
        }
        Some("-V") | Some("--version") => {
            println!("tai {}", VERSION);
            return ExitCode::SUCCESS;
        }
        Some("format") => run_format(&tai, &args[1..]),
        Some("decompose") => run_decompose(&tai, &args[1..]),
        Some("compose") => run_compose(&tai, &args[1..]),
        Some(other) => {
            eprintln!("tai: unknown command '{}'\n\n{}", other, USAGE);
            return ExitCode::from(2);
        }
    };

    match result {
        Ok(text) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("tai: {}", with_cli_hint(err));
            ExitCode::FAILURE
        }
    }
}

// ========== One-shot commands ==========

fn parse_stamp(arg: &str) -> Result<f64, TaiError> {
    arg.parse::<f64>()
        .map_err(|_| TaiError::parse_error(format!("'{}' is not a number of seconds", arg)))
}

fn missing(what: &str) -> TaiError {
    TaiError::parse_error(format!("missing {}", what)).with_suggestion("Run `tai --help` for usage")
}

/// Point directive errors at the usage text
fn with_cli_hint(err: TaiError) -> TaiError {
    if err.code == codes::UNSUPPORTED_DIRECTIVE {
        err.with_suggestion("Run `tai --help` for the list of FORMAT directives")
    } else {
        err
    }
}

fn run_format(tai: &Tai, args: &[String]) -> Result<String, TaiError> {
    let format = args.first().ok_or_else(|| missing("FORMAT"))?;
    let stamp = match args.get(1) {
        Some(arg) => parse_stamp(arg)?,
        None => AtomicTime::now().to_unix_seconds(),
    };
    tai.render(format, RenderInput::Stamp(stamp))
}

fn run_decompose(tai: &Tai, args: &[String]) -> Result<String, TaiError> {
    let stamp = parse_stamp(args.first().ok_or_else(|| missing("STAMP"))?)?;
    let mode = match args.get(1) {
        Some(arg) => arg.parse()?,
        None => OffsetMode::Local,
    };
    let civil = tai.decompose(stamp, mode)?;
    to_json_string(&civil.to_fields())
}

fn run_compose(tai: &Tai, args: &[String]) -> Result<String, TaiError> {
    let record = args.first().ok_or_else(|| missing("RECORD"))?;
    let fields: CivilFields = serde_json::from_str(record).map_err(|e| TaiError::parse_error(e.to_string()))?;
    Ok(tai.compose(&fields)?.to_string())
}

fn to_json_string<T: Serialize>(value: &T) -> Result<String, TaiError> {
    serde_json::to_string(value).map_err(|e| TaiError::internal(e.to_string()))
}

// ========== JSON-lines loop ==========

fn serve(tai: &Tai) -> ExitCode {
    tracing::info!(version = VERSION, locale = tai.locale_name(), "reading requests from stdin");

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::error!("error reading input: {}", e);
                return ExitCode::FAILURE;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = match handle_line(tai, line) {
            Ok(value) => Response::Ok(value),
            Err(err) => {
                tracing::debug!(code = %err.code, "request failed");
                Response::Error(err)
            }
        };

        let encoded = match serde_json::to_string(&response) {
            Ok(encoded) => encoded,
            Err(e) => {
                tracing::error!("error encoding response: {}", e);
                json!({ "error": TaiError::internal(e.to_string()) }).to_string()
            }
        };
        if let Err(e) = writeln!(stdout, "{}", encoded).and_then(|_| stdout.flush()) {
            tracing::error!("error writing response: {}", e);
            return ExitCode::FAILURE;
        }
    }

    tracing::info!("end of input");
    ExitCode::SUCCESS
}

fn handle_line(tai: &Tai, line: &str) -> Result<JsonValue, TaiError> {
    let request: Request = serde_json::from_str(line).map_err(|e| TaiError::parse_error(e.to_string()))?;
    handle(tai, request).map_err(with_cli_hint)
}

fn handle(tai: &Tai, request: Request) -> Result<JsonValue, TaiError> {
    match request {
        Request::Format { format, input } => {
            let input = input.unwrap_or_else(|| RenderInput::Stamp(AtomicTime::now().to_unix_seconds()));
            Ok(JsonValue::String(tai.render(&format, input)?))
        }
        Request::Decompose { stamp, offset } => {
            let mode = match offset {
                Some(offset) => offset.mode()?,
                None => OffsetMode::Local,
            };
            let civil = tai.decompose(stamp, mode)?;
            serde_json::to_value(civil.to_fields()).map_err(|e| TaiError::internal(e.to_string()))
        }
        Request::Compose { fields } => Ok(JsonValue::from(tai.compose(&fields)?)),
    }
}
