//! Integration test: merchant builds a request, gateway opens it.
//!
//! Exercises yeepay-sdk on top of yeepay-crypto and yeepay-core with the
//! two parties' roles swapped on the receiving side.

use url::Url;
use yeepay_crypto::test_utils::gateway;
use yeepay_crypto::{decrypt_params, unwrap_key, verify_with_public_key};
use yeepay_integration_tests::{gateway_client, merchant_client, MERCHANT_ACCOUNT};
use yeepay_sdk::{to_query_string, CallbackPayload, ParamValue, ParameterSet, WebPayRequest};

fn payment() -> ParameterSet {
    ParameterSet::new()
        .with("orderid", "1")
        .with("transtime", "t")
        .with("amount", 100)
        .with("identityid", "id")
        .with("userip", "1.2.3.4")
        .with("userua", "ua")
}

// =========================================================================
// Request envelope: merchant → gateway
// =========================================================================

#[test]
fn test_gateway_recovers_request_and_signature() {
    let merchant = merchant_client();
    let request = merchant
        .build_payment_request(&payment())
        .expect("build should succeed")
        .expect("complete request passes the gate");
    assert_eq!(request.merchantaccount, MERCHANT_ACCOUNT);

    // Gateway side opens it with its own private key
    let opened = gateway_client()
        .open_callback(&request.data, &request.encryptkey)
        .expect("gateway should authenticate merchant request");
    assert_eq!(opened, payment());

    // The carried signature is exactly what the merchant computes
    let key = unwrap_key(&request.encryptkey, &gateway().private_key).unwrap();
    let mut decrypted = decrypt_params(&request.data, &key).unwrap();
    let sign = decrypted.take_sign().expect("sign field present");
    let sign = sign.as_str().expect("sign is text");
    assert_eq!(sign, merchant.sign(&payment()).unwrap());
    assert!(merchant.verify(&payment(), sign).unwrap());
    assert!(verify_with_public_key(&payment(), sign, &yeepay_crypto::test_utils::merchant().public_key));
}

#[test]
fn test_validation_gate_blocks_incomplete_request() {
    let merchant = merchant_client();
    assert!(merchant.build_payment_request(&payment()).unwrap().is_some());

    let mut without_amount = payment();
    without_amount.remove("amount");
    assert!(merchant.build_payment_request(&without_amount).unwrap().is_none());

    // Every required field blocks on its own
    for field in yeepay_core::REQUIRED_FIELDS {
        let mut params = payment();
        params.insert(*field, "");
        assert!(
            merchant.build_payment_request(&params).unwrap().is_none(),
            "empty {} should be rejected",
            field
        );
    }
}

#[test]
fn test_request_over_the_wire_as_query_string() {
    let request = merchant_client().build_request(&payment()).unwrap();
    let query = to_query_string(&request);

    let payload = CallbackPayload::from_query(&query).unwrap();
    assert!(gateway_client().verify_callback(&payload.data, &payload.encryptkey));
    assert!(gateway_client().verify_callback_query(&query));
}

// =========================================================================
// Callback: gateway → merchant
// =========================================================================

#[test]
fn test_merchant_accepts_gateway_callback() {
    let callback = ParameterSet::new()
        .with("merchantaccount", MERCHANT_ACCOUNT)
        .with("orderid", "order-42")
        .with("yborderid", "411307055580374212")
        .with("amount", 2500)
        .with("status", 1)
        .with("identityid", "user-7")
        .with("identitytype", 2);
    let sent = gateway_client().build_request(&callback).unwrap();

    let merchant = merchant_client();
    assert!(merchant.verify_callback(&sent.data, &sent.encryptkey));
    let opened = merchant.open_callback(&sent.data, &sent.encryptkey).unwrap();
    assert_eq!(opened, callback);
    assert!(!opened.contains_key("sign"));
}

// =========================================================================
// Mobile web-pay URL
// =========================================================================

#[test]
fn test_web_pay_url_round_trip() {
    let mut request = WebPayRequest::new("order-1", 1_700_000_000, 100, "user-1", "10.0.0.1", "Mozilla/5.0");
    request.productname = Some("Coffee".into());
    let url = merchant_client()
        .web_pay(&request)
        .unwrap()
        .expect("complete request yields a URL");

    let parsed = Url::parse(&url).unwrap();
    assert_eq!(parsed.host_str(), Some("ok.yeepay.com"));
    assert_eq!(parsed.path(), "/paymobile/pay/request");
    let names: Vec<String> = parsed.query_pairs().map(|(k, _)| k.into_owned()).collect();
    assert_eq!(names, ["merchantaccount", "encryptkey", "data"]);

    let payload = CallbackPayload::from_query(parsed.query().unwrap()).unwrap();
    let opened = gateway_client().open_callback(&payload.data, &payload.encryptkey).unwrap();

    // Merchant defaults merged under the request fields
    assert_eq!(opened.get("merchantaccount"), Some(&ParamValue::from(MERCHANT_ACCOUNT)));
    assert_eq!(opened.get("currency"), Some(&ParamValue::from(156)));
    assert_eq!(opened.get("productcatalog"), Some(&ParamValue::from("1")));
    assert_eq!(opened.get("identitytype"), Some(&ParamValue::from(2)));
    assert_eq!(opened.get("terminaltype"), Some(&ParamValue::from(3)));
    assert_eq!(opened.get("productname"), Some(&ParamValue::from("Coffee")));
    assert_eq!(opened.get("amount"), Some(&ParamValue::from(100)));
}

#[test]
fn test_web_pay_incomplete_yields_nothing() {
    let merchant = merchant_client();
    assert_eq!(merchant.web_pay(&WebPayRequest::default()).unwrap(), None);

    let mut request = WebPayRequest::new("order-1", 1_700_000_000, 100, "user-1", "10.0.0.1", "ua");
    request.identityid = None;
    assert_eq!(merchant.web_pay(&request).unwrap(), None);
}
