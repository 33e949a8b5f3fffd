//! `/alert-generator` endpoints.

use crate::http::{ApiClient, ApiError, with_query};
use crate::models::generator::{
    AlertGenerationResponse, GenerateAndSaveResponse, GeneratorStatus, StudentAlertRequest,
};
use crate::validation;

/// Generate alerts for the described student without storing them.
pub fn generate(client: &mut ApiClient, request: &StudentAlertRequest) -> Result<AlertGenerationResponse, ApiError> {
    validation::generator_form(request)?;
    client.post("/alert-generator/generate", request)
}

/// Generate alerts and store them for `student_id`. The saved alerts show
/// up in the parent's alert list.
pub fn generate_and_save(
    client: &mut ApiClient,
    request: &StudentAlertRequest,
    student_id: &str,
) -> Result<GenerateAndSaveResponse, ApiError> {
    validation::generator_form(request)?;
    let path = with_query(
        "/alert-generator/generate-and-save",
        &[("student_id", student_id.to_string())],
    );
    client.post(&path, request)
}

/// Whether the generator is up, and whether it runs with AI or rules.
pub fn test_connection(client: &mut ApiClient) -> Result<GeneratorStatus, ApiError> {
    client.get("/alert-generator/test-connection")
}
