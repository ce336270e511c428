use std::fmt;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::Args;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode, Url};
use tracing::{debug, info};

#[derive(Debug, Args)]
pub struct HttpArgs {
    /// HTTP method (get, post, put, patch, delete, head, options, connect, trace)
    #[arg(value_name = "METHOD")]
    pub method: HttpMethod,
    /// Request URI
    #[arg(value_name = "URI")]
    pub uri: Url,
    /// Request body sent as text
    #[arg(short, long)]
    pub body: Option<String>,
    /// Request header, may be repeated
    #[arg(short = 'H', long = "header", value_name = "KEY: VALUE", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,
    /// Print the status only
    #[arg(long)]
    pub status_only: bool,
    /// Also write the response body to this file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
    Connect,
    Trace,
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "get" => Ok(Self::Get),
            "post" => Ok(Self::Post),
            "put" => Ok(Self::Put),
            "patch" => Ok(Self::Patch),
            "delete" => Ok(Self::Delete),
            "head" => Ok(Self::Head),
            "options" => Ok(Self::Options),
            "connect" => Ok(Self::Connect),
            "trace" => Ok(Self::Trace),
            _ => Err(format!("unsupported http method '{s}'")),
        }
    }
}

impl From<HttpMethod> for Method {
    fn from(value: HttpMethod) -> Self {
        match value {
            HttpMethod::Get => Self::GET,
            HttpMethod::Post => Self::POST,
            HttpMethod::Put => Self::PUT,
            HttpMethod::Patch => Self::PATCH,
            HttpMethod::Delete => Self::DELETE,
            HttpMethod::Head => Self::HEAD,
            HttpMethod::Options => Self::OPTIONS,
            HttpMethod::Connect => Self::CONNECT,
            HttpMethod::Trace => Self::TRACE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(Method::from(*self).as_str())
    }
}

/// Split `Key: Value` at the first colon
fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("invalid header '{raw}', expected KEY: VALUE"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("invalid header '{raw}', missing name"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

pub fn run(args: &HttpArgs, out: &mut impl Write) -> Result<()> {
    let client = Client::builder()
        .build()
        .context("failed to build http client")?;

    let mut request = client.request(args.method.into(), args.uri.clone());
    for (key, value) in &args.headers {
        request = request.header(key.as_str(), value.as_str());
    }
    if let Some(body) = args.body.as_deref().filter(|body| !body.is_empty()) {
        let has_content_type = args
            .headers
            .iter()
            .any(|(key, _)| key.eq_ignore_ascii_case(CONTENT_TYPE.as_str()));
        if !has_content_type {
            request = request.header(CONTENT_TYPE, "text/plain; charset=utf-8");
        }
        request = request.body(body.to_string());
    }

    info!(method = %args.method, uri = %args.uri, "sending request");
    let response = request
        .send()
        .with_context(|| format!("{} {} failed", args.method, args.uri))?;

    let status = response.status();
    let body = response.text().context("failed to read response body")?;
    debug!(status = status.as_u16(), bytes = body.len(), "response received");

    write_report(out, status, &body, args.status_only)?;
    if let Some(path) = &args.output {
        fs::write(path, &body)
            .with_context(|| format!("failed to write output file {}", path.display()))?;
    }
    Ok(())
}

fn write_report(
    out: &mut impl Write,
    status: StatusCode,
    body: &str,
    status_only: bool,
) -> Result<()> {
    let outcome = if status.is_success() {
        "The HTTP request was sent successfully."
    } else {
        "The HTTP request was not sent successfully."
    };
    writeln!(out, "{outcome}").context("failed to write stdout")?;
    writeln!(out, "StatusCode: {} {}", status_name(status), status.as_u16())
        .context("failed to write stdout")?;

    if !status_only && !body.is_empty() {
        writeln!(out, "Payload: {body}").context("failed to write stdout")?;
    }
    Ok(())
}

/// Reason phrase without separators, e.g. `NotFound`
fn status_name(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => reason.chars().filter(char::is_ascii_alphanumeric).collect(),
        None => status.as_u16().to_string(),
    }
}
