use axum::body::Body;
use axum::http::Request;

#[allow(dead_code)]
pub fn json_request(
    method: &str,
    uri: &str,
    role: Option<&str>,
    body: serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(role) = role {
        builder = builder.header("x-actor-role", role);
    }
    builder.body(Body::from(body.to_string())).expect("request")
}

#[allow(dead_code)]
pub fn get_request(uri: &str, role: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(role) = role {
        builder = builder.header("x-actor-role", role);
    }
    builder.body(Body::empty()).expect("request")
}
