//! Print the OpenAPI document, or write it to the path given as the first
//! argument.

use server::openapi::ApiDoc;
use utoipa::OpenApi;

fn main() {
    let doc = match ApiDoc::openapi().to_pretty_json() {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("Failed to serialize OpenAPI document: {e}");
            std::process::exit(1);
        }
    };

    match std::env::args().nth(1) {
        Some(path) => {
            if let Err(e) = std::fs::write(&path, doc) {
                eprintln!("Failed to write {path}: {e}");
                std::process::exit(1);
            }
            eprintln!("Wrote {path}");
        }
        None => println!("{doc}"),
    }
}
