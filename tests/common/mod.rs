//! Shared fixtures for integration tests.
#![allow(dead_code)]

use flate2::Compression;
use flate2::write::GzEncoder;
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::thread::{self, JoinHandle};
use tempfile::TempDir;

/// Stands in for `vacuum report`: checks that the ruleset arrives through
/// `/dev/fd`, then picks its behaviour from keywords in the ruleset.
const FAKE_VACUUM: &str = r#"#!/bin/sh
ruleset=""
while [ $# -gt 0 ]; do
  case "$1" in
    --ruleset) ruleset="$2"; shift ;;
  esac
  shift
done
case "$ruleset" in
  /dev/fd/*) ;;
  *) echo "ruleset is not a pipe: $ruleset" >&2; exit 3 ;;
esac
rules=$(cat "$ruleset")
case "$rules" in
  *fatal*) echo "unable to load ruleset" >&2; exit 2 ;;
  *failing*) echo "linting failed"; exit 1 ;;
esac
spec_bytes=$(wc -c | tr -d ' ')
case "$rules" in
  *silent*) echo '{"specInfo":{}}' ;;
  *) printf '{"resultSet":{"results":[{"message":"read %s spec bytes","range":{"start":{"line":0,"character":0},"end":{"line":0,"character":7}},"path":"$.servers","ruleId":"oas3-api-servers","ruleSeverity":"warn"}]}}\n' "$spec_bytes" ;;
esac
"#;

static FAKE: OnceLock<(TempDir, PathBuf)> = OnceLock::new();

/// Path to the fake vacuum script, written once per test binary.
///
/// Every test must call this before spawning anything: writing an executable
/// while another thread forks can make `exec` fail with ETXTBSY.
#[cfg(unix)]
pub fn fake_vacuum() -> &'static Path {
    use std::os::unix::fs::PermissionsExt;

    let (_, path) = FAKE.get_or_init(|| {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vacuum");
        std::fs::write(&path, FAKE_VACUUM).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        (dir, path)
    });
    path
}

pub const EMPTY_SPEC: &str = r#"{"openapi":"3.1.0","info":{"title":"Empty","description":"An empty spec","version":"0.1.0"},"paths":{}}"#;

pub const EMPTY_RULESET: &str = r#"{"rules":{}}"#;

/// A syntactically valid spec with `resources` paths, a few MB for 35k.
pub fn large_spec(resources: usize) -> String {
    let mut paths = Vec::with_capacity(resources);
    let mut tags = Vec::with_capacity(resources);
    for i in 0..resources {
        let name = format!("res{:06}", i);
        paths.push(format!(
            r#""/{name}":{{"get":{{"summary":"List {name} resources","operationId":"list{name}","tags":["{name}"],"responses":{{"200":{{"description":"A list of {name} resources.","content":{{"application/json":{{"schema":{{"type":"array","items":{{"type":"object"}}}}}}}}}}}}}}}}"#
        ));
        tags.push(format!(r#"{{"name":"{name}","description":"A {name} resource."}}"#));
    }
    format!(
        r#"{{"openapi":"3.1.0","info":{{"title":"Large","description":"A large spec","version":"0.1.0"}},"tags":[{}],"paths":{{{}}}}}"#,
        tags.join(","),
        paths.join(",")
    )
}

/// A release tarball carrying a LICENSE and the binary as `name`.
pub fn release_tarball(name: &str, binary: &[u8]) -> Vec<u8> {
    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    for (member, data) in [("LICENSE", b"MIT".as_slice()), (name, binary)] {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o755);
        builder.append_data(&mut header, member, data).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

/// Read a request head off `stream` and return the request path.
pub fn request_path(stream: &TcpStream) -> String {
    let mut reader = BufReader::new(stream.try_clone().unwrap());
    let mut request_line = String::new();
    reader.read_line(&mut request_line).unwrap();
    loop {
        let mut header = String::new();
        let n = reader.read_line(&mut header).unwrap();
        if n == 0 || header == "\r\n" {
            break;
        }
    }
    request_line
        .split_whitespace()
        .nth(1)
        .unwrap_or_default()
        .to_string()
}

/// Serve `routes` for exactly `connections` requests; returns the requested paths.
pub fn serve(routes: HashMap<String, Vec<u8>>, connections: usize) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let mut seen = Vec::new();
        for stream in listener.incoming().take(connections) {
            let mut stream = stream.unwrap();
            let path = request_path(&stream);
            let (status, body) = match routes.get(&path) {
                Some(body) => ("200 OK", body.clone()),
                None => ("404 Not Found", b"Not Found".to_vec()),
            };
            write!(
                stream,
                "HTTP/1.1 {}\r\nContent-Type: application/octet-stream\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status,
                body.len()
            )
            .unwrap();
            stream.write_all(&body).unwrap();
            stream.flush().unwrap();
            seen.push(path);
        }
        seen
    });

    (base, handle)
}

/// True when the environment routes HTTP through a proxy, which would
/// bypass a local release server for clients built from the environment.
pub fn proxy_configured() -> bool {
    ["http_proxy", "HTTP_PROXY", "all_proxy", "ALL_PROXY"]
        .iter()
        .any(|var| std::env::var_os(var).is_some_and(|v| !v.is_empty()))
}
