use super::*;

#[test]
fn header_lookup_is_case_insensitive() {
    let request = HttpRequest {
        method: HttpMethod::Get,
        url: "http://localhost:3000/shipment/all".to_owned(),
        headers: vec![("Authorization".to_owned(), "Bearer abc".to_owned())],
        body: None,
    };
    assert_eq!(request.header("authorization"), Some("Bearer abc"));
    assert_eq!(request.header("content-type"), None);
}

#[test]
fn response_success_covers_2xx_only() {
    assert!(HttpResponse::new(200, "").is_success());
    assert!(HttpResponse::new(204, "").is_success());
    assert!(!HttpResponse::new(199, "").is_success());
    assert!(!HttpResponse::new(301, "").is_success());
    assert!(!HttpResponse::new(401, "").is_success());
}

#[test]
fn method_names_match_http_verbs() {
    assert_eq!(HttpMethod::Get.as_str(), "GET");
    assert_eq!(HttpMethod::Post.as_str(), "POST");
    assert_eq!(HttpMethod::Put.as_str(), "PUT");
    assert_eq!(HttpMethod::Delete.as_str(), "DELETE");
}

#[cfg(not(feature = "csr"))]
#[test]
fn gloo_transport_is_unavailable_outside_browser() {
    let request = HttpRequest {
        method: HttpMethod::Get,
        url: "http://localhost:3000/track".to_owned(),
        headers: Vec::new(),
        body: None,
    };
    let result = futures::executor::block_on(GlooTransport.send(request));
    assert_eq!(result, Err(TransportError::Unavailable));
}
