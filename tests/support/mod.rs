//! Shared fixtures for integration tests

#![allow(dead_code)]

use serde_json::{json, Value};
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::mpsc;

/// One `/api/v1/catalog` page with entities named after `names`
pub fn entity_page(names: &[&str], page: u32, total_pages: u32, total: u64) -> Value {
    let entities: Vec<Value> = names
        .iter()
        .map(|n| json!({"name": n, "tag": n.to_lowercase(), "type": "service"}))
        .collect();
    json!({"entities": entities, "page": page, "totalPages": total_pages, "total": total})
}

pub fn scorecard(rules: &[(&str, &str, i64)], levels: &[(&str, i64)]) -> Value {
    let rules: Vec<Value> = rules
        .iter()
        .map(|(id, level, weight)| json!({"identifier": id, "title": id, "levelName": level, "weight": weight}))
        .collect();
    let levels: Vec<Value> = levels
        .iter()
        .map(|(name, number)| json!({"level": {"name": name, "number": number}}))
        .collect();
    json!({"scorecard": {"rules": rules, "levels": levels}})
}

pub fn service_scores(services: &[(&str, &[(&str, i64)])], page: u32, total_pages: u32) -> Value {
    let scores: Vec<Value> = services
        .iter()
        .map(|(service, rules)| {
            let rules: Vec<Value> = rules
                .iter()
                .map(|(id, score)| json!({"identifier": id, "score": score}))
                .collect();
            json!({
                "lastEvaluated": "2025-05-02T12:00:00Z",
                "service": {"name": service, "tag": service},
                "score": {"rules": rules}
            })
        })
        .collect();
    json!({
        "scorecardName": "Production Readiness",
        "scorecardTag": "prod-ready",
        "serviceScores": scores,
        "page": page,
        "totalPages": total_pages,
        "total": services.len()
    })
}

/// Serve `responses` in order, one connection each, on a loopback port.
/// Request lines are sent back over the channel.
pub fn serve_sequence(responses: Vec<(&'static str, String)>) -> (String, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        for (status_line, body) in responses {
            let Ok((stream, _)) = listener.accept() else {
                return;
            };
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut request_line = String::new();
            let mut line = String::new();
            loop {
                line.clear();
                if reader.read_line(&mut line).unwrap_or(0) == 0 || line == "\r\n" {
                    break;
                }
                if request_line.is_empty() {
                    request_line = line.trim_end().to_string();
                }
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            let mut stream = stream;
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
            let _ = tx.send(request_line);
        }
    });
    (format!("http://{}", addr), rx)
}
