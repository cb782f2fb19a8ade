//! AWS Lambda handler for retirement projections
//!
//! Accepts a profile as the JSON request body, optionally with a `config`
//! object overriding projection defaults, and returns `{"saved", "needed"}`.
//! Failures return `{"error": message}`.
//!
//! Supports Lambda Function URLs for direct HTTP access.

use lambda_http::{run, service_fn, Body, Error, Request, Response};
use retirement_calculator::{CalculatorError, Profile, ProjectionConfig, ProjectionEngine};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct EstimateResponse {
    saved: f64,
    needed: f64,
}

#[derive(Debug, Serialize)]
struct ErrorResponse<'a> {
    error: &'a str,
}

fn response<T: Serialize>(status: u16, body: &T) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type")
        .body(Body::Text(serde_json::to_string(body)?))?)
}

fn error_response(status: u16, message: &str) -> Result<Response<Body>, Error> {
    response(status, &ErrorResponse { error: message })
}

/// Split the request document into the profile and an optional config
fn parse_request(body: &str) -> Result<(Profile, ProjectionConfig), CalculatorError> {
    let mut document: serde_json::Value = serde_json::from_str(body)?;
    let config = match document.as_object_mut().and_then(|o| o.remove("config")) {
        Some(value) => serde_json::from_value(value)?,
        None => ProjectionConfig::default(),
    };
    Ok((Profile::from_json_value(document)?, config))
}

/// Lambda handler function
async fn handler(event: Request) -> Result<Response<Body>, Error> {
    // Handle CORS preflight
    if event.method().as_str() == "OPTIONS" {
        return Ok(Response::builder()
            .status(200)
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", "POST, OPTIONS")
            .header("Access-Control-Allow-Headers", "Content-Type")
            .body(Body::Empty)?);
    }

    let body_str = match event.body() {
        Body::Text(s) => s.clone(),
        Body::Binary(b) => String::from_utf8_lossy(b).to_string(),
        Body::Empty => "{}".to_string(),
    };

    let (profile, config) = match parse_request(&body_str) {
        Ok(parsed) => parsed,
        Err(e) => {
            log::warn!("Rejected request: {}", e);
            return error_response(400, &format!("cannot parse request as profile: {}", e));
        }
    };

    let estimate = match ProjectionEngine::new(config).and_then(|engine| engine.project(&profile)) {
        Ok(estimate) => estimate,
        Err(e) if e.is_validation() => {
            log::warn!("Rejected config: {}", e);
            return error_response(400, &e.to_string());
        }
        Err(e) => {
            log::error!("Projection failed: {}", e);
            return error_response(500, "error on server");
        }
    };

    response(
        200,
        &EstimateResponse {
            saved: estimate.saved,
            needed: estimate.needed,
        },
    )
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
