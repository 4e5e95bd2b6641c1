//! `restree` — run one resource request against a JSON document.
//!
//! Usage:
//!   restree <method> <path> [body]
//!
//! The document is read from stdin and its shape is inferred (objects
//! become records, arrays lists). Reads print the addressed resource;
//! mutations print the whole updated document.

use std::io::{self, Read};

use restree::codec;
use restree::{Service, Status};

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let (method, path) = match (args.get(1), args.get(2)) {
        (Some(method), Some(path)) => (method.clone(), path.clone()),
        _ => {
            eprintln!("usage: restree <method> <path> [body]");
            std::process::exit(2);
        }
    };
    let body = args.get(3).cloned().unwrap_or_default();

    let mut buf = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut buf) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    let doc: serde_json::Value = match serde_json::from_str(buf.trim()) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    let root = match codec::infer(&doc) {
        Ok((_, root)) => root,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let service = Service::new(root);
    let response = service.handle(&method, &path, &body);
    if response.status != Status::Ok {
        eprintln!("{} {}", response.status.http_code(), response.body);
        std::process::exit(1);
    }
    if response.body.is_empty() {
        println!("{}", codec::encode_string(&service.snapshot()));
    } else {
        println!("{}", response.body);
    }
}
