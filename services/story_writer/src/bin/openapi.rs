//! services/story_writer/src/bin/openapi.rs
//!
//! Writes the OpenAPI document of the HTTP API to `openapi.json`.

use story_writer_lib::web::ApiDoc;
use utoipa::OpenApi;

fn generate_document(
    api_doc: utoipa::openapi::OpenApi,
    path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let document = api_doc.to_pretty_json()?;
    std::fs::write(path, document)?;
    println!("✅ OpenAPI document written to {}", path);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    generate_document(ApiDoc::openapi(), "openapi.json")
}
