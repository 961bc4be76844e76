use lantern::handler::product::{ProductError, process_product_query};
use lantern::handler::{Handler, ProductHandler};
use lantern::http::parser::parse_http_request;
use lantern::http::response::StatusCode;
use serde_json::{Value, json};

fn result_of(query: &str) -> Value {
    process_product_query(query).unwrap().to_json()["result"].clone()
}

#[test]
fn test_integer_product() {
    assert_eq!(result_of("a=2&b=3"), json!(6));
}

#[test]
fn test_whole_float_product_renders_as_integer() {
    let result = result_of("a=2.5&b=4");
    assert_eq!(result.as_f64(), Some(10.0));
    assert_eq!(result, json!(10));
}

#[test]
fn test_large_whole_values_render_as_integers() {
    let doc = process_product_query("a=9007199254740994&b=1").unwrap().to_json();
    assert_eq!(doc["operands"][0].to_string(), "9007199254740994");
    assert_eq!(doc["result"].to_string(), "9007199254740994");
    assert!(doc["result"].is_i64());

    let result = result_of("a=1e10&b=1e10");
    assert_eq!(result.to_string(), "100000000000000000000");
    assert_eq!(result.as_f64(), Some(1e20));
}

#[test]
fn test_negative_zero_renders_as_zero() {
    assert_eq!(result_of("a=-0&b=5").to_string(), "0");
}

#[test]
fn test_fractional_product() {
    assert_eq!(result_of("a=0.5&b=3"), json!(1.5));
    assert_eq!(result_of("x=-1.5"), json!(-1.5));
}

#[test]
fn test_product_is_commutative_and_associative() {
    let orders = ["a=2&b=3&c=7", "c=7&a=2&b=3", "b=3&c=7&a=2"];
    for query in orders {
        assert_eq!(result_of(query), json!(42), "{query}");
    }
}

#[test]
fn test_overflow_reports_signed_infinity() {
    assert_eq!(result_of("a=1e200&b=1e200"), json!("inf"));
    assert_eq!(result_of("a=-1e200&b=1e200"), json!("-inf"));
}

#[test]
fn test_operands_listed_in_order() {
    let doc = process_product_query("a=2&b=0.5&&c=-3").unwrap().to_json();

    assert_eq!(doc["operation"], json!("product"));
    assert_eq!(doc["operands"], json!([2, 0.5, -3]));
    assert_eq!(doc["result"], json!(-3));
}

#[test]
fn test_rejected_queries() {
    assert_eq!(process_product_query(""), Err(ProductError::EmptyQuery));
    assert_eq!(process_product_query("&&"), Err(ProductError::EmptyQuery));
    assert!(matches!(process_product_query("a="), Err(ProductError::MissingValue(_))));
    assert!(matches!(process_product_query("2&3"), Err(ProductError::MissingValue(_))));
    assert!(matches!(process_product_query("a=x"), Err(ProductError::InvalidOperand(_))));
    assert!(matches!(process_product_query("a=1&b=inf"), Err(ProductError::InvalidOperand(_))));
    assert!(matches!(process_product_query("a=NaN"), Err(ProductError::InvalidOperand(_))));
}

async fn call(raw: &str) -> (StatusCode, Value) {
    let request = parse_http_request(raw.as_bytes()).unwrap();
    let response = ProductHandler.handle(&request).await;
    assert_eq!(response.headers.get("content-type"), Some("application/json"));
    (response.status, serde_json::from_slice(&response.body).unwrap())
}

#[tokio::test]
async fn test_handler_success() {
    let (status, body) = call("GET /product?a=2&b=3 HTTP/1.0\r\n\r\n").await;

    assert_eq!(status, StatusCode::Ok);
    assert_eq!(
        body,
        json!({"operation": "product", "operands": [2, 3], "result": 6})
    );
}

#[tokio::test]
async fn test_handler_unknown_path() {
    for raw in [
        "GET / HTTP/1.0\r\n\r\n",
        "GET /products?a=1 HTTP/1.0\r\n\r\n",
        "GET /product/?a=1 HTTP/1.0\r\n\r\n",
    ] {
        let (status, body) = call(raw).await;
        assert_eq!(status, StatusCode::NotFound, "{raw:?}");
        assert_eq!(body, json!({"error": "Not Found"}));
    }
}

#[tokio::test]
async fn test_handler_bad_query() {
    for raw in [
        "GET /product HTTP/1.0\r\n\r\n",
        "GET /product?a=2&b= HTTP/1.0\r\n\r\n",
        "GET /product?a=two HTTP/1.0\r\n\r\n",
    ] {
        let (status, body) = call(raw).await;
        assert_eq!(status, StatusCode::BadRequest, "{raw:?}");
        assert_eq!(body, json!({"error": "Bad Request"}));
    }
}
