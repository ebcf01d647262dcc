//! Command-line client for the LinkPaste API.

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use linkpaste_core::DEFAULT_CLI_SERVER_URL;
use serde_json::{json, Value};
use std::io::{self, Read};
use std::time::{Duration, Instant};


#[derive(Parser)]
#[command(name = "lnpaste", about = "LinkPaste CLI", version)]
struct Cli {
    /// Server URL (can also be set via LNPASTE_SERVER env var)
    #[arg(short, long, env = "LNPASTE_SERVER")]
    server: Option<String>,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    json: bool,

    /// Print timing for API requests
    #[arg(long, global = true)]
    timing: bool,

    /// Request timeout in seconds
    #[arg(short = 't', long, default_value = "30")]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PrivacyArg {
    Public,
    Unlisted,
    Private,
}

impl PrivacyArg {
    fn as_api_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Unlisted => "unlisted",
            Self::Private => "private",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ExpirationArg {
    #[value(name = "1h")]
    OneHour,
    #[value(name = "1d")]
    OneDay,
    #[value(name = "1w")]
    OneWeek,
    Never,
}

impl ExpirationArg {
    fn as_api_str(self) -> &'static str {
        match self {
            Self::OneHour => "1h",
            Self::OneDay => "1d",
            Self::OneWeek => "1w",
            Self::Never => "never",
        }
    }
}

/// Optional paste attributes shared by `new` and `edit`.
#[derive(Args, Debug, Default, Clone, PartialEq, Eq)]
struct PasteFields {
    /// Paste title (an empty string clears it on edit)
    #[arg(long)]
    title: Option<String>,
    /// Language hint for highlighting
    #[arg(short, long)]
    language: Option<String>,
    #[arg(short, long, value_enum)]
    privacy: Option<PrivacyArg>,
    /// Lifetime measured from now
    #[arg(short, long, value_enum)]
    expiration: Option<ExpirationArg>,
}

impl PasteFields {
    fn write_into(self, body: &mut Value) {
        if let Some(title) = self.title {
            body["title"] = title.into();
        }
        if let Some(language) = self.language {
            body["language"] = language.into();
        }
        if let Some(privacy) = self.privacy {
            body["privacy"] = privacy.as_api_str().into();
        }
        if let Some(expiration) = self.expiration {
            body["expiration"] = expiration.as_api_str().into();
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Create a paste from a file or stdin
    New {
        #[arg(short, long)]
        file: Option<String>,
        #[command(flatten)]
        fields: PasteFields,
    },
    /// Print a paste's content
    Get {
        slug: String,
        /// Secret token, required for private pastes
        #[arg(long)]
        token: Option<String>,
    },
    /// Print raw content without counting a view
    Raw {
        slug: String,
        #[arg(long)]
        token: Option<String>,
    },
    /// Change a paste you own
    Edit {
        slug: String,
        #[arg(long)]
        token: String,
        /// Replace content with this file's contents
        #[arg(short, long)]
        file: Option<String>,
        #[command(flatten)]
        fields: PasteFields,
    },
    /// Delete a paste you own
    Delete {
        slug: String,
        #[arg(long)]
        token: String,
    },
}

fn log_timing(timing: bool, label: &str, duration: Duration) {
    if timing {
        eprintln!(
            "[timing] {}: {:.1} ms",
            label,
            duration.as_secs_f64() * 1000.0
        );
    }
}

fn log_timing_parts(timing: bool, label: &str, request: Duration, parse: Option<Duration>) {
    if !timing {
        return;
    }
    if let Some(parse) = parse {
        let total = request + parse;
        eprintln!(
            "[timing] {}: request {:.1} ms, parse {:.1} ms, total {:.1} ms",
            label,
            request.as_secs_f64() * 1000.0,
            parse.as_secs_f64() * 1000.0,
            total.as_secs_f64() * 1000.0
        );
    } else {
        log_timing(timing, label, request);
    }
}

fn error_message_for_response(status: reqwest::StatusCode, body: &str) -> String {
    if body.trim().is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string();
    }

    if let Ok(value) = serde_json::from_str::<Value>(body) {
        return value
            .get("error")
            .and_then(|v| v.as_str())
            .unwrap_or(body)
            .to_string();
    }

    body.to_string()
}

async fn ensure_success_or_exit(res: reqwest::Response, action: &str) -> reqwest::Response {
    let status = res.status();
    if status.is_success() {
        return res;
    }

    let body = match res.text().await {
        Ok(body) => body,
        Err(err) => format!("failed to read error response body: {}", err),
    };
    let message = error_message_for_response(status, &body);
    eprintln!("{} failed ({}): {}", action, status, message);
    std::process::exit(1);
}

fn exit_on_format_error(action: &str, output: Result<String, String>) -> String {
    match output {
        Ok(output) => output,
        Err(message) => {
            eprintln!("{} failed: {}", action, message);
            std::process::exit(1);
        }
    }
}

fn pretty(value: &Value) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|err| format!("response encoding error: {}", err))
}

fn create_body(content: String, fields: PasteFields) -> Value {
    let mut body = json!({ "content": content });
    fields.write_into(&mut body);
    body
}

fn update_body(token: &str, content: Option<String>, fields: PasteFields) -> Value {
    let mut body = json!({ "token": token });
    if let Some(content) = content {
        body["content"] = content.into();
    }
    fields.write_into(&mut body);
    body
}

fn format_created_output(server: &str, created: &Value, json: bool) -> Result<String, String> {
    if json {
        return pretty(created);
    }

    let slug = created
        .get("slug")
        .and_then(Value::as_str)
        .ok_or_else(|| "response missing 'slug' field".to_string())?;
    let token = created
        .get("secretToken")
        .and_then(Value::as_str)
        .ok_or_else(|| "response missing 'secretToken' field".to_string())?;
    Ok(format!(
        "Created: {slug}\nURL:     {server}/{slug}\nToken:   {token}\n\
         Keep the token: it is required to edit or delete this paste and is not shown again."
    ))
}

fn format_get_output(paste: &Value, json: bool) -> Result<String, String> {
    if json {
        return pretty(paste);
    }

    paste
        .get("content")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| "response missing 'content' field".to_string())
}

fn format_updated_output(paste: &Value, json: bool) -> Result<String, String> {
    if json {
        return pretty(paste);
    }

    let slug = paste
        .get("slug")
        .and_then(Value::as_str)
        .ok_or_else(|| "response missing 'slug' field".to_string())?;
    Ok(format!("Updated paste: {}", slug))
}

fn format_delete_output(slug: &str, response: &Value, json: bool) -> Result<String, String> {
    if json {
        return pretty(response);
    }

    Ok(format!("Deleted paste: {}", slug))
}

fn api_url(server: &str, segments: &[&str]) -> Result<reqwest::Url, String> {
    let mut url = reqwest::Url::parse(server)
        .map_err(|err| format!("Invalid server URL '{}': {}", server, err))?;
    let mut path = url
        .path_segments_mut()
        .map_err(|_| "Server URL cannot be used as an API base".to_string())?;
    path.pop_if_empty();
    for segment in segments {
        path.push(segment);
    }
    drop(path);
    Ok(url)
}

fn api_url_or_exit(server: &str, action: &str, segments: &[&str]) -> reqwest::Url {
    match api_url(server, segments) {
        Ok(url) => url,
        Err(message) => {
            eprintln!("{} failed: {}", action, message);
            std::process::exit(1);
        }
    }
}

fn normalize_server(server: String) -> String {
    if let Ok(mut url) = reqwest::Url::parse(&server) {
        let should_normalize_localhost =
            url.scheme().eq_ignore_ascii_case("http") && url.host_str() == Some("localhost");
        if should_normalize_localhost && url.set_host(Some("127.0.0.1")).is_err() {
            return server;
        }
        let mut normalized = url.to_string();
        while normalized.ends_with('/') {
            normalized.pop();
        }
        return normalized;
    }
    server
}

fn resolve_server(server: Option<String>) -> String {
    server
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_CLI_SERVER_URL.to_string())
}

fn read_content(file: Option<String>) -> io::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

fn token_query(token: Option<&str>) -> Vec<(&'static str, &str)> {
    token
        .map(|token| vec![("token", token)])
        .unwrap_or_default()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let Cli {
        server,
        json,
        timing,
        timeout,
        command,
    } = Cli::parse();

    if let Commands::Completions { shell } = &command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout))
        .build()?;
    let server = normalize_server(resolve_server(server));

    match command {
        Commands::Completions { .. } => unreachable!("completions handled before client setup"),
        Commands::New { file, fields } => {
            let endpoint = api_url_or_exit(&server, "New", &["api", "pastes"]);
            let body = create_body(read_content(file)?, fields);

            let request_start = Instant::now();
            let res = client.post(endpoint).json(&body).send().await?;
            let request_elapsed = request_start.elapsed();
            let res = ensure_success_or_exit(res, "New").await;

            let parse_start = Instant::now();
            let created: Value = res.json().await?;
            let parse_elapsed = parse_start.elapsed();

            log_timing_parts(timing, "new", request_elapsed, Some(parse_elapsed));
            let output = exit_on_format_error("New", format_created_output(&server, &created, json));
            println!("{}", output);
        }
        Commands::Get { slug, token } => {
            let endpoint = api_url_or_exit(&server, "Get", &["api", "pastes", slug.as_str()]);
            let request_start = Instant::now();
            let res = client
                .get(endpoint)
                .query(&token_query(token.as_deref()))
                .send()
                .await?;
            let request_elapsed = request_start.elapsed();
            let res = ensure_success_or_exit(res, "Get").await;

            let parse_start = Instant::now();
            let paste: Value = res.json().await?;
            let parse_elapsed = parse_start.elapsed();

            log_timing_parts(timing, "get", request_elapsed, Some(parse_elapsed));
            println!("{}", exit_on_format_error("Get", format_get_output(&paste, json)));
        }
        Commands::Raw { slug, token } => {
            let endpoint =
                api_url_or_exit(&server, "Raw", &["api", "pastes", slug.as_str(), "raw"]);
            let request_start = Instant::now();
            let res = client
                .get(endpoint)
                .query(&token_query(token.as_deref()))
                .send()
                .await?;
            let res = ensure_success_or_exit(res, "Raw").await;
            let content = res.text().await?;
            log_timing(timing, "raw", request_start.elapsed());
            print!("{}", content);
        }
        Commands::Edit {
            slug,
            token,
            file,
            fields,
        } => {
            let endpoint = api_url_or_exit(&server, "Edit", &["api", "pastes", slug.as_str()]);
            let content = match file {
                Some(path) => Some(std::fs::read_to_string(path)?),
                None => None,
            };
            let body = update_body(&token, content, fields);

            let request_start = Instant::now();
            let res = client.patch(endpoint).json(&body).send().await?;
            let request_elapsed = request_start.elapsed();
            let res = ensure_success_or_exit(res, "Edit").await;

            let parse_start = Instant::now();
            let paste: Value = res.json().await?;
            let parse_elapsed = parse_start.elapsed();

            log_timing_parts(timing, "edit", request_elapsed, Some(parse_elapsed));
            println!("{}", exit_on_format_error("Edit", format_updated_output(&paste, json)));
        }
        Commands::Delete { slug, token } => {
            let endpoint = api_url_or_exit(&server, "Delete", &["api", "pastes", slug.as_str()]);
            let request_start = Instant::now();
            let res = client
                .delete(endpoint)
                .json(&json!({ "token": token }))
                .send()
                .await?;
            let request_elapsed = request_start.elapsed();
            let res = ensure_success_or_exit(res, "Delete").await;
            let parse_start = Instant::now();
            let response: Value = res.json().await?;
            let parse_elapsed = parse_start.elapsed();
            log_timing_parts(timing, "delete", request_elapsed, Some(parse_elapsed));

            println!(
                "{}",
                exit_on_format_error("Delete", format_delete_output(&slug, &response, json))
            );
        }
    }

    Ok(())
}
