//! EvmLedgerClient against a wiremock JSON-RPC node.
//!
//! Each JSON-RPC method gets its own mock, matched on the `method` field of
//! the request body.

use kyc_core::{IdentitySubmission, ValidatedIdentity};
use kyc_ledger::{EvmLedgerClient, EvmLedgerConfig, LedgerClient, LedgerError, SigningKeyHex};
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CONTRACT: &str = "0x5fbdb2315678afecb367f032d93f642f64180aa3";
const SUBJECT: &str = "0x00000000000000000000000000000000000000ab";
const TX_HASH: &str = "0x9fc76417374aa880d4449a1f7f31ec597f00b1f6f3dd2d66f4c9c6c445836d8b";

fn client(server: &MockServer) -> EvmLedgerClient {
    let key = SigningKeyHex::parse(&"46".repeat(32)).unwrap();
    let config = EvmLedgerConfig::new(server.uri().parse().unwrap(), CONTRACT, key)
        .unwrap()
        .with_timeout(5);
    EvmLedgerClient::new(config).unwrap()
}

fn identity(address: &str) -> ValidatedIdentity {
    IdentitySubmission {
        address: Some(address.into()),
        name: Some("Alice".into()),
        id_type: Some("passport".into()),
        id_number: Some("X123".into()),
        day_of_birth: Some(1),
        month_of_birth: Some(1),
        year_of_birth: Some(1990),
    }
    .validate_at(2026)
    .unwrap()
}

fn rpc_result(result: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "jsonrpc": "2.0", "id": 1, "result": result }))
}

fn rpc_error(message: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "jsonrpc": "2.0",
        "id": 1,
        "error": { "code": 3, "message": message }
    }))
}

async fn mount(server: &MockServer, rpc_method: &str, response: ResponseTemplate, times: u64) {
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "method": rpc_method })))
        .respond_with(response)
        .expect(times)
        .mount(server)
        .await;
}

async fn requests_for(server: &MockServer, rpc_method: &str) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter_map(|r| serde_json::from_slice::<Value>(&r.body).ok())
        .filter(|body| body["method"] == rpc_method)
        .collect()
}

#[tokio::test]
async fn verify_broadcasts_signed_transaction() {
    let server = MockServer::start().await;
    mount(&server, "eth_getTransactionCount", rpc_result(json!("0x9")), 1).await;
    mount(&server, "eth_gasPrice", rpc_result(json!("0x4a817c800")), 1).await;
    mount(&server, "eth_estimateGas", rpc_result(json!("0x1d4c0")), 1).await;
    mount(&server, "eth_sendRawTransaction", rpc_result(json!(TX_HASH)), 1).await;

    let ledger = client(&server);
    let receipt = ledger.verify_kyc(&identity(SUBJECT)).await.unwrap();

    assert_eq!(receipt.transaction_hash, TX_HASH);
    assert_eq!(receipt.address, SUBJECT);
    assert_eq!(receipt.network, "sepolia");

    let nonce_req = &requests_for(&server, "eth_getTransactionCount").await[0];
    assert_eq!(nonce_req["params"][0], ledger.sender_address());
    assert_eq!(nonce_req["params"][1], "pending");

    let estimate = &requests_for(&server, "eth_estimateGas").await[0];
    assert_eq!(estimate["params"][0]["to"], CONTRACT);
    let data = estimate["params"][0]["data"].as_str().unwrap();
    assert!(data.starts_with("0x45618fa3"), "{data}");
    // raw identity fields travel in the calldata, not the fingerprint
    assert!(data.contains(&hex::encode("passport")));

    let send = &requests_for(&server, "eth_sendRawTransaction").await[0];
    let raw = send["params"][0].as_str().unwrap();
    assert!(raw.starts_with("0xf9"), "expected long RLP list, got {raw}");
    assert!(raw.contains(&data[2..]));
}

#[tokio::test]
async fn revert_during_estimation_broadcasts_nothing() {
    let server = MockServer::start().await;
    mount(&server, "eth_getTransactionCount", rpc_result(json!("0x0")), 1).await;
    mount(&server, "eth_gasPrice", rpc_result(json!("0x1")), 1).await;
    mount(&server, "eth_estimateGas", rpc_error("execution reverted: already verified"), 1).await;
    mount(&server, "eth_sendRawTransaction", rpc_result(json!(TX_HASH)), 0).await;

    let err = client(&server)
        .verify_kyc(&identity(SUBJECT))
        .await
        .unwrap_err();

    match err {
        LedgerError::Rejected { network, reason } => {
            assert_eq!(network, "sepolia");
            assert!(reason.contains("execution reverted"), "{reason}");
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_subject_address_makes_no_rpc_calls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(rpc_result(json!("0x0")))
        .expect(0)
        .mount(&server)
        .await;

    let err = client(&server)
        .verify_kyc(&identity("0xabc"))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidAddress(ref a) if a == "0xabc"));

    let err = client(&server).kyc_status("not-an-address").await.unwrap_err();
    assert!(matches!(err, LedgerError::InvalidAddress(_)));
}

#[tokio::test]
async fn status_decodes_contract_bool() {
    let server = MockServer::start().await;
    let true_word = format!("0x{:0>64}", "1");
    mount(&server, "eth_call", rpc_result(json!(true_word)), 1).await;

    let ledger = client(&server);
    assert!(ledger.kyc_status(SUBJECT).await.unwrap());

    let call = &requests_for(&server, "eth_call").await[0];
    assert_eq!(call["params"][0]["to"], CONTRACT);
    assert_eq!(
        call["params"][0]["data"],
        format!("0xa5410a66{:0>64}", "ab")
    );
    assert_eq!(call["params"][1], "latest");
}

#[tokio::test]
async fn status_false_for_unverified_address() {
    let server = MockServer::start().await;
    mount(&server, "eth_call", rpc_result(json!(format!("0x{}", "0".repeat(64)))), 1).await;

    assert!(!client(&server).kyc_status(SUBJECT).await.unwrap());
}

#[tokio::test]
async fn short_return_data_is_malformed() {
    let server = MockServer::start().await;
    mount(&server, "eth_call", rpc_result(json!("0x")), 1).await;

    let err = client(&server).kyc_status(SUBJECT).await.unwrap_err();
    assert!(matches!(err, LedgerError::MalformedResponse { .. }));
}

#[tokio::test]
async fn http_error_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client(&server).kyc_status(SUBJECT).await.unwrap_err();
    assert!(matches!(err, LedgerError::Unavailable { .. }));
}

#[tokio::test]
async fn unreachable_node_is_unavailable() {
    let key = SigningKeyHex::parse(&"46".repeat(32)).unwrap();
    let config = EvmLedgerConfig::new("http://127.0.0.1:1".parse().unwrap(), CONTRACT, key)
        .unwrap()
        .with_timeout(2);
    let ledger = EvmLedgerClient::new(config).unwrap();

    let err = ledger.verify_kyc(&identity(SUBJECT)).await.unwrap_err();
    assert!(matches!(err, LedgerError::Unavailable { .. }));
}
