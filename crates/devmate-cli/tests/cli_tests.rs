use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn devmate() -> Result<Command, Box<dyn std::error::Error>> {
    Ok(Command::cargo_bin("devmate")?)
}

#[test]
fn convert_xml_to_json_from_stdin() -> TestResult {
    devmate()?
        .args(["convert", "xml", "json"])
        .write_stdin("<root><name>devmate</name><port>8080</port><tls>True</tls></root>")
        .assert()
        .success()
        .stdout(r#"{"name":"devmate","port":8080,"tls":true}"#.to_string() + "\n");
    Ok(())
}

#[test]
fn convert_pretty_json() -> TestResult {
    devmate()?
        .args(["convert", "XML", "Json", "--pretty"])
        .write_stdin("<root><a>1</a></root>")
        .assert()
        .success()
        .stdout("{\n  \"a\": 1\n}\n");
    Ok(())
}

#[test]
fn convert_json_to_xml_file_to_file() -> TestResult {
    let dir = tempdir()?;
    let input = dir.path().join("input.json");
    let output = dir.path().join("output.xml");
    fs::write(&input, r#"{"items":[1,2],"owner":null}"#)?;

    devmate()?
        .arg("convert")
        .arg("json")
        .arg("xml")
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("<root><items>"));

    assert_eq!(
        fs::read_to_string(&output)?,
        "<root><items><item>1</item><item>2</item></items><owner /></root>"
    );
    Ok(())
}

#[test]
fn convert_unsupported_pair_is_noop() -> TestResult {
    devmate()?
        .args(["convert", "json", "json"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("unsupported conversion"));
    Ok(())
}

#[test]
fn convert_malformed_input_fails() -> TestResult {
    devmate()?
        .args(["convert", "xml", "json"])
        .write_stdin("<a><b></a>")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("parse error"));
    Ok(())
}

#[test]
fn convert_invalid_key_fails() -> TestResult {
    devmate()?
        .args(["convert", "json", "xml"])
        .write_stdin(r#"{"1st":true}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("serialization error"));
    Ok(())
}

#[test]
fn convert_missing_input_file_fails() -> TestResult {
    let dir = tempdir()?;
    devmate()?
        .args(["convert", "xml", "json", "-i"])
        .arg(dir.path().join("missing.xml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read input file"));
    Ok(())
}

#[test]
fn uuid_prints_v4() -> TestResult {
    let pattern =
        predicate::str::is_match(r"^[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}\n$")?;
    devmate()?.arg("uuid").assert().success().stdout(pattern);
    Ok(())
}

#[test]
fn uuid_count_upper() -> TestResult {
    let pattern = predicate::str::is_match(r"^([0-9A-F]{8}-[0-9A-F]{4}-4[0-9A-F]{3}-[89AB][0-9A-F]{3}-[0-9A-F]{12}\n){3}$")?;
    devmate()?
        .args(["uuid", "-n", "3", "--upper"])
        .assert()
        .success()
        .stdout(pattern);
    Ok(())
}

#[test]
fn uuid_rejects_zero_count() -> TestResult {
    devmate()?.args(["uuid", "-n", "0"]).assert().failure();
    Ok(())
}

#[test]
fn http_rejects_unknown_method() -> TestResult {
    devmate()?
        .args(["http", "fetch", "http://127.0.0.1:9/"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported http method"));
    Ok(())
}

#[test]
fn http_rejects_malformed_header() -> TestResult {
    devmate()?
        .args(["http", "get", "http://127.0.0.1:9/", "-H", "no-colon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("KEY: VALUE"));
    Ok(())
}
