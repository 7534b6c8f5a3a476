// Integration tests for the named backend operations
// Each operation must hit its backend path with the right method

use crate::helpers::success_envelope;

use console_core::console_client::{AuthContext, ConsoleClient};

use serde_json::json;
use wiremock::matchers::any;
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn catch_all_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_json(success_envelope(json!({}))))
        .mount(&server)
        .await;
    server
}

/// **VALUE**: Every operation maps to the backend path and method it always used.
///
/// **WHY THIS MATTERS**: Paths are an external contract with the gateway. A typo
/// here is a 404 in production for exactly one screen.
///
/// **BUG THIS CATCHES**: Would catch a swapped or mistyped endpoint constant.
#[tokio::test]
async fn given_each_operation_when_called_then_hits_expected_method_and_path() {
    let server = catch_all_server().await;
    let client = ConsoleClient::new(&server.uri()).unwrap();
    let auth = AuthContext::with_token("abc123");
    let params = [("page", "1")];
    let body = json!({ "id": "42" });

    client.register(&auth, &body).await.unwrap();
    client.ticket_search(&auth, &params).await.unwrap();
    client.region_station(&auth, &params).await.unwrap();
    client.passenger_list(&auth, &params).await.unwrap();
    client.delete_passenger(&auth, &body).await.unwrap();
    client.add_passenger(&auth, &body).await.unwrap();
    client.edit_passenger(&auth, &body).await.unwrap();
    client.buy_ticket(&auth, &body).await.unwrap();
    client.order_by_sn(&auth, &params).await.unwrap();
    client.pay(&auth, &body).await.unwrap();
    client.station_all(&auth).await.unwrap();
    client.user_info(&auth, &params).await.unwrap();
    client.train_station(&auth, &params).await.unwrap();
    client.ticket_list(&auth, &params).await.unwrap();
    client.order_cancel(&auth, &body).await.unwrap();
    client.user_update(&auth, &body).await.unwrap();
    client.order_status(&auth, &params).await.unwrap();
    client.my_ticket(&auth, &params).await.unwrap();
    client.refund_ticket(&auth, &body).await.unwrap();
    client.user_info_list(&auth, &body).await.unwrap();
    client.order_info_list(&auth, &body).await.unwrap();

    let expected = [
        ("POST", "/api/user-service/register"),
        ("GET", "/api/ticket-service/ticket/query"),
        ("GET", "/api/ticket-service/region-station/query"),
        ("GET", "/api/user-service/passenger/query"),
        ("POST", "/api/user-service/passenger/remove"),
        ("POST", "/api/user-service/passenger/save"),
        ("POST", "/api/user-service/passenger/update"),
        ("POST", "/api/ticket-service/ticket/purchase/v2"),
        ("GET", "/api/order-service/order/ticket/query"),
        ("POST", "/api/pay-service/pay/create"),
        ("GET", "/api/ticket-service/station/all"),
        ("GET", "/api/user-service/query"),
        ("GET", "/api/ticket-service/train-station/query"),
        ("GET", "/api/order-service/order/ticket/page"),
        ("POST", "/api/ticket-service/ticket/cancel"),
        ("POST", "/api/user-service/update"),
        ("GET", "/api/pay-service/pay/query/order-sn"),
        ("GET", "/api/order-service/order/ticket/self/page"),
        ("POST", "/api/ticket-service/ticket/refund"),
        ("POST", "/api/user-service/queryList"),
        ("POST", "/api/order-service/order/ticket/queryList"),
    ];

    let received = server.received_requests().await.unwrap();
    let actual: Vec<(String, String)> = received
        .iter()
        .map(|r| (r.method.to_string(), r.url.path().to_string()))
        .collect();
    let expected: Vec<(String, String)> = expected
        .iter()
        .map(|(m, p)| (m.to_string(), p.to_string()))
        .collect();
    assert_eq!(actual, expected);

    for request in &received {
        assert_eq!(
            request.headers.get("authorization").unwrap(),
            "abc123",
            "{} missing Authorization",
            request.url.path()
        );
    }
}

#[tokio::test]
async fn given_get_operation_with_params_when_called_then_params_become_query_string() {
    let server = catch_all_server().await;
    let client = ConsoleClient::new(&server.uri()).unwrap();

    client
        .ticket_search(
            &AuthContext::anonymous(),
            &json!({ "fromStation": "BJP", "toStation": "SHH", "departureDate": "2026-10-20" }),
        )
        .await
        .unwrap();

    let received = server.received_requests().await.unwrap();
    let query: Vec<(String, String)> = received[0]
        .url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    assert!(query.contains(&("fromStation".to_string(), "BJP".to_string())));
    assert!(query.contains(&("toStation".to_string(), "SHH".to_string())));
    assert!(query.contains(&("departureDate".to_string(), "2026-10-20".to_string())));
}

#[tokio::test]
async fn given_post_operation_when_called_then_body_is_json() {
    let server = catch_all_server().await;
    let client = ConsoleClient::new(&server.uri()).unwrap();
    let body = json!({ "orderSn": "1700000000", "channel": 0 });

    client.pay(&AuthContext::anonymous(), &body).await.unwrap();

    let received = server.received_requests().await.unwrap();
    let sent: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
    assert_eq!(sent, body);
    assert_eq!(
        received[0].headers.get("content-type").unwrap(),
        "application/json"
    );
}

#[tokio::test]
async fn given_envelope_response_when_called_then_payload_is_unwrapped() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(success_envelope(json!([{ "code": "BJP", "name": "Beijing" }]))),
        )
        .mount(&server)
        .await;
    let client = ConsoleClient::new(&server.uri()).unwrap();

    let envelope = client.station_all(&AuthContext::anonymous()).await.unwrap();

    assert_eq!(envelope.code, Some(json!("0")));
    assert_eq!(envelope.data.unwrap()[0]["name"], "Beijing");
}

#[tokio::test]
async fn given_empty_response_body_when_called_then_returns_empty_envelope() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    let client = ConsoleClient::new(&server.uri()).unwrap();

    let envelope = client
        .refund_ticket(&AuthContext::anonymous(), &json!({ "orderSn": "1" }))
        .await
        .unwrap();

    assert_eq!(envelope, Default::default());
}

#[tokio::test]
async fn given_base_url_with_prefix_when_called_then_prefix_is_kept() {
    let server = catch_all_server().await;
    let client = ConsoleClient::new(&format!("{}/gateway", server.uri())).unwrap();

    client.station_all(&AuthContext::anonymous()).await.unwrap();

    let received = server.received_requests().await.unwrap();
    assert_eq!(
        received[0].url.path(),
        "/gateway/api/ticket-service/station/all"
    );
}
