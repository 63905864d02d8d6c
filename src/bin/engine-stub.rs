//! Stub process engine for development testing
//!
//! This binary mimics curl talking to a process engine, for testing
//! flowsmith without a running engine. Point `engine.curl_program` at it and
//! the curl transport will invoke it with the same argv it would hand to
//! curl; the stub answers with engine-shaped JSON on stdout.
//!
//! Scenarios are selected via the `FLOWSMITH_STUB_SCENARIO` environment
//! variable:
//!
//! - `ok` (default): both endpoints answer with their identifier
//! - `missing-field`: valid JSON bodies without the identifier fields
//! - `malformed`: a non-JSON body, as a proxied gateway error would produce
//! - `connect-error`: curl's exit code 7 with its connection message
//! - `slow`: sleeps `FLOWSMITH_STUB_HANG_SECS` (default 10) before answering

use std::path::Path;
use std::thread;
use std::time::Duration;

use serde_json::json;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    Deploy,
    Start,
}

/// The curl argv shape the transport produces, reduced to what the stub
/// needs: the endpoint URL, an optional `-d` payload, and an optional
/// `-F field=@path` upload.
struct Invocation {
    endpoint: Endpoint,
    data: Option<String>,
    upload: Option<String>,
}

fn main() {
    let invocation = match parse_argv(std::env::args().skip(1)) {
        Ok(invocation) => invocation,
        Err(message) => {
            eprintln!("engine-stub: {message}");
            std::process::exit(2);
        }
    };

    let scenario =
        std::env::var("FLOWSMITH_STUB_SCENARIO").unwrap_or_else(|_| "ok".to_string());

    match scenario.as_str() {
        "missing-field" => respond_missing_field(invocation.endpoint),
        "malformed" => println!("<html><body>502 Bad Gateway</body></html>"),
        "connect-error" => {
            eprintln!(
                "curl: (7) Failed to connect to localhost port 8080: Connection refused"
            );
            std::process::exit(7);
        }
        "slow" => {
            let hang_secs: u64 = std::env::var("FLOWSMITH_STUB_HANG_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10);
            thread::sleep(Duration::from_secs(hang_secs));
            respond_ok(&invocation);
        }
        _ => respond_ok(&invocation),
    }
}

fn parse_argv(args: impl Iterator<Item = String>) -> Result<Invocation, String> {
    let mut args = args;
    let mut data = None;
    let mut upload = None;
    let mut url = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-s" | "-S" | "-sS" => {}
            "-X" | "-H" => {
                args.next();
            }
            "-d" | "--data" => data = args.next(),
            "-F" | "--form" => upload = args.next(),
            other if !other.starts_with('-') => url = Some(other.to_string()),
            other => return Err(format!("unrecognized curl flag: {other}")),
        }
    }

    let url = url.ok_or("no URL argument")?;
    let endpoint = if url.ends_with("/deploy") {
        Endpoint::Deploy
    } else if url.ends_with("/start") {
        Endpoint::Start
    } else {
        return Err(format!("unknown endpoint: {url}"));
    };

    Ok(Invocation {
        endpoint,
        data,
        upload,
    })
}

fn respond_ok(invocation: &Invocation) {
    match invocation.endpoint {
        Endpoint::Deploy => {
            let Some(upload) = invocation.upload.as_deref() else {
                eprintln!("engine-stub: deploy without -F upload");
                std::process::exit(2);
            };
            let definition_id = match deployed_definition_id(upload) {
                Ok(id) => id,
                Err(message) => {
                    // Same exit code and shape curl uses for an unreadable -F file.
                    eprintln!("curl: (26) Failed to open/read local data from file/application: {message}");
                    std::process::exit(26);
                }
            };
            println!("{}", json!({ "processDefinitionId": definition_id }));
        }
        Endpoint::Start => {
            let definition_id = invocation
                .data
                .as_deref()
                .and_then(|data| serde_json::from_str::<serde_json::Value>(data).ok())
                .and_then(|value| {
                    value
                        .get("processDefinitionId")
                        .and_then(|id| id.as_str())
                        .map(str::to_string)
                });
            let Some(definition_id) = definition_id else {
                eprintln!("engine-stub: start without a processDefinitionId payload");
                std::process::exit(2);
            };
            println!("{}", json!({ "processInstanceId": format!("inst-{definition_id}") }));
        }
    }
}

fn respond_missing_field(endpoint: Endpoint) {
    // Valid JSON, wrong shape: what a different engine version might answer.
    match endpoint {
        Endpoint::Deploy => println!("{}", json!({ "deployedAt": "2026-01-15T09:30:00Z" })),
        Endpoint::Start => println!("{}", json!({ "links": [] })),
    }
}

/// Derive a deterministic engine-style id (`key:version:resource`) from the
/// uploaded file, proving the stub read the actual artifact.
fn deployed_definition_id(upload: &str) -> Result<String, String> {
    let path = upload
        .split_once("=@")
        .map(|(_, path)| path)
        .ok_or_else(|| format!("not a file form value: {upload}"))?;

    let content = std::fs::read(path).map_err(|e| e.to_string())?;
    let stem = Path::new(path)
        .file_stem()
        .map_or_else(|| "definition".to_string(), |s| s.to_string_lossy().into_owned());

    Ok(format!("{stem}:1:{}", content.len()))
}
