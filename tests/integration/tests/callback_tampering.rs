//! Integration test: callback authentication edge cases.
//!
//! Every rejection surfaces as `false` from `verify_callback`, never a panic
//! or an error.

use yeepay_crypto::test_utils::{gateway, merchant};
use yeepay_crypto::{decrypt_params, encrypt_params, unwrap_key, wrap_key, SessionKey};
use yeepay_integration_tests::{config_for, gateway_client, merchant_client, MERCHANT_ACCOUNT};
use yeepay_sdk::{ParamValue, ParameterSet, SdkError, SignedRequest, YeepayClient};

fn callback() -> ParameterSet {
    ParameterSet::new()
        .with("merchantaccount", MERCHANT_ACCOUNT)
        .with("orderid", "order-42")
        .with("amount", 2500)
        .with("status", 1)
}

fn sent() -> SignedRequest {
    gateway_client().build_request(&callback()).unwrap()
}

/// Decrypt with the merchant's key, edit, and re-seal under the same key.
fn reseal(request: &SignedRequest, edit: impl FnOnce(&mut ParameterSet)) -> String {
    let key = unwrap_key(&request.encryptkey, &merchant().private_key).unwrap();
    let mut params = decrypt_params(&request.data, &key).unwrap();
    edit(&mut params);
    encrypt_params(&params, &key).unwrap()
}

#[test]
fn test_untouched_callback_verifies() {
    let sent = sent();
    assert!(merchant_client().verify_callback(&sent.data, &sent.encryptkey));
}

#[test]
fn test_each_field_tamper_detected() {
    let sent = sent();
    let client = merchant_client();
    for field in ["merchantaccount", "orderid", "amount", "status"] {
        let data = reseal(&sent, |params| {
            params.insert(field, "tampered");
        });
        assert!(!client.verify_callback(&data, &sent.encryptkey), "{} tamper undetected", field);
    }
}

#[test]
fn test_added_field_detected() {
    let sent = sent();
    let data = reseal(&sent, |params| {
        params.insert("refund", 1);
    });
    assert!(!merchant_client().verify_callback(&data, &sent.encryptkey));
}

#[test]
fn test_stripped_signature_rejected() {
    let sent = sent();
    let data = reseal(&sent, |params| {
        params.remove("sign");
    });
    let client = merchant_client();
    assert!(!client.verify_callback(&data, &sent.encryptkey));
    assert!(matches!(client.open_callback(&data, &sent.encryptkey), Err(SdkError::Crypto(_))));
}

#[test]
fn test_forged_signer_rejected() {
    // Signed by the merchant's own key instead of the gateway's.
    let forger = YeepayClient::new(config_for(merchant(), merchant())).unwrap();
    let forged = forger.build_request(&callback()).unwrap();
    let client = merchant_client();
    assert!(!client.verify_callback(&forged.data, &forged.encryptkey));
    assert!(matches!(
        client.open_callback(&forged.data, &forged.encryptkey),
        Err(SdkError::SignatureMismatch)
    ));
}

#[test]
fn test_wrong_session_key_rejected() {
    let sent = sent();
    let other = wrap_key(&SessionKey::generate(), &merchant().public_key).unwrap();
    assert!(!merchant_client().verify_callback(&sent.data, &other));
}

#[test]
fn test_malformed_inputs_rejected() {
    let sent = sent();
    let client = merchant_client();
    assert!(!client.verify_callback("", &sent.encryptkey));
    assert!(!client.verify_callback("not base64!", &sent.encryptkey));
    assert!(!client.verify_callback(&sent.data[..sent.data.len() / 2], &sent.encryptkey));
    assert!(!client.verify_callback(&sent.data, ""));
    assert!(!client.verify_callback(&sent.data, "AAAA"));
    assert!(!client.verify_callback_query("orderid=1"));
}

#[test]
fn test_callback_for_gateway_not_openable_by_merchant() {
    // Wrapped for the gateway: the merchant cannot unwrap it.
    let outbound = merchant_client().build_request(&callback()).unwrap();
    assert!(!merchant_client().verify_callback(&outbound.data, &outbound.encryptkey));
}

// =========================================================================
// Decimal amounts
// =========================================================================

/// Seal a callback body exactly as given, signed with the gateway key.
fn seal_raw(fields_json: &str) -> SignedRequest {
    let params: ParameterSet = serde_json::from_str(fields_json).unwrap();
    let sign = yeepay_crypto::sign(&params, &gateway().private_key).unwrap();
    let body = format!("{},\"sign\":\"{}\"}}", fields_json.trim_end_matches('}'), sign);

    let key = SessionKey::generate();
    SignedRequest {
        merchantaccount: MERCHANT_ACCOUNT.into(),
        encryptkey: wrap_key(&key, &merchant().public_key).unwrap(),
        data: yeepay_crypto::encrypt(&body, &key),
    }
}

#[test]
fn test_decimal_callback_verifies() {
    let sent = seal_raw(r#"{"amount":0.01,"orderid":"o1","status":1}"#);
    let client = merchant_client();
    assert!(client.verify_callback(&sent.data, &sent.encryptkey));

    let opened = client.open_callback(&sent.data, &sent.encryptkey).unwrap();
    assert_eq!(opened.get("amount").unwrap().to_string(), "0.01");
    assert_eq!(opened.get("status"), Some(&ParamValue::from(1)));
}

#[test]
fn test_decimal_respelling_detected() {
    let sent = seal_raw(r#"{"amount":0.01,"orderid":"o1","status":1}"#);
    let key = unwrap_key(&sent.encryptkey, &merchant().private_key).unwrap();
    let body = yeepay_crypto::decrypt(&sent.data, &key).unwrap();
    let respelled = body.replace("0.01", "0.010");
    assert_ne!(body, respelled);

    let data = yeepay_crypto::encrypt(&respelled, &key);
    assert!(!merchant_client().verify_callback(&data, &sent.encryptkey));
}
