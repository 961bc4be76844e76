//! The `/product` JSON endpoint: multiplies every query parameter value.

use serde::Serialize;
use serde_json::{Number, Value, json};
use thiserror::Error;
use tracing::debug;

use crate::handler::Handler;
use crate::http::request::Request;
use crate::http::response::{Response, StatusCode};

pub const PRODUCT_PATH: &str = "/product";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProductError {
    #[error("query string is empty")]
    EmptyQuery,
    #[error("parameter {0:?} has no value")]
    MissingValue(String),
    #[error("operand {0:?} is not a finite number")]
    InvalidOperand(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub operands: Vec<f64>,
    pub result: f64,
}

#[derive(Serialize)]
struct ProductBody {
    operation: &'static str,
    operands: Vec<Value>,
    result: Value,
}

/// Parses `key=value&key=value...` and multiplies the values.
///
/// Empty segments (`a=1&&b=2`) are skipped. A segment without `=`, an empty
/// value, or a value that is not a finite number rejects the whole query.
pub fn process_product_query(query: &str) -> Result<Product, ProductError> {
    let mut operands = Vec::new();

    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let Some((_, raw)) = pair.split_once('=') else {
            return Err(ProductError::MissingValue(pair.to_string()));
        };
        if raw.is_empty() {
            return Err(ProductError::MissingValue(pair.to_string()));
        }

        let value = raw
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ProductError::InvalidOperand(raw.to_string()))?;
        operands.push(value);
    }

    if operands.is_empty() {
        return Err(ProductError::EmptyQuery);
    }

    let result: f64 = operands.iter().product();
    Ok(Product { operands, result })
}

impl Product {
    /// The response document: operands and result rendered as integers when
    /// whole, with an overflowed result reported as `"inf"` or `"-inf"`.
    pub fn to_json(&self) -> Value {
        let result = if self.result.is_infinite() {
            json!(if self.result > 0.0 { "inf" } else { "-inf" })
        } else if self.result.is_nan() {
            // inf * 0 after an intermediate overflow
            json!("nan")
        } else {
            render_number(self.result)
        };

        json!(ProductBody {
            operation: "product",
            operands: self.operands.iter().copied().map(render_number).collect(),
            result,
        })
    }
}

/// Whole values become integer literals of any magnitude (`1e20` renders as
/// `100000000000000000000`); the rest keep their float form.
fn render_number(value: f64) -> Value {
    if value.fract() == 0.0 {
        // `+ 0.0` folds -0 into 0.
        if let Ok(n) = format!("{:.0}", value + 0.0).parse::<Number>() {
            return Value::Number(n);
        }
    }
    json!(value)
}

fn error_body(message: &str) -> Vec<u8> {
    json!({ "error": message }).to_string().into_bytes()
}

/// Serves [`PRODUCT_PATH`]; every other path is 404. The method is not checked.
#[derive(Debug, Clone, Default)]
pub struct ProductHandler;

impl Handler for ProductHandler {
    async fn handle(&self, request: &Request) -> Response {
        let (path, query) = request.path_and_query();

        if path != PRODUCT_PATH {
            return Response::json(StatusCode::NotFound, error_body("Not Found"));
        }

        match process_product_query(query) {
            Ok(product) => Response::json(StatusCode::Ok, product.to_json().to_string()),
            Err(e) => {
                debug!(query, error = %e, "Rejected product query");
                Response::json(StatusCode::BadRequest, error_body("Bad Request"))
            }
        }
    }
}
