//! `yeepay verify`: Authenticate a payment-result callback.

use clap::Args;
use std::path::PathBuf;
use yeepay_core::ClientConfig;
use yeepay_sdk::{CallbackPayload, ParameterSet, YeepayClient};

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Path to the client configuration file.
    #[arg(short, long, default_value = "yeepay.toml")]
    pub config: PathBuf,

    /// The callback `data` field.
    #[arg(long, requires = "encryptkey", conflicts_with = "query")]
    pub data: Option<String>,

    /// The callback `encryptkey` field.
    #[arg(long, requires = "data")]
    pub encryptkey: Option<String>,

    /// The raw callback query string, instead of --data/--encryptkey.
    #[arg(long)]
    pub query: Option<String>,
}

impl VerifyArgs {
    fn payload(&self) -> anyhow::Result<CallbackPayload> {
        match (&self.data, &self.encryptkey, &self.query) {
            (Some(data), Some(encryptkey), None) => Ok(CallbackPayload {
                data: data.clone(),
                encryptkey: encryptkey.clone(),
            }),
            (None, None, Some(query)) => Ok(CallbackPayload::from_query(query)?),
            _ => anyhow::bail!("pass either --data and --encryptkey, or --query"),
        }
    }
}

/// Open the callback with an already constructed client.
pub fn open(client: &YeepayClient, args: &VerifyArgs) -> anyhow::Result<ParameterSet> {
    let payload = args.payload()?;
    client
        .open_callback(&payload.data, &payload.encryptkey)
        .map_err(|e| anyhow::anyhow!("callback rejected: {}", e))
}

pub fn run(args: &VerifyArgs) -> anyhow::Result<()> {
    let config = ClientConfig::load(&args.config)?;
    let client = YeepayClient::new(config)?;
    let params = open(&client, args)?;
    println!("Callback verified.");
    println!("{}", serde_json::to_string_pretty(&params)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixture::Workspace;
    use yeepay_sdk::{to_query_string, ParamValue};

    fn callback() -> ParameterSet {
        ParameterSet::new()
            .with("merchantaccount", "10000000000")
            .with("orderid", "order-1")
            .with("amount", 100)
            .with("status", 1)
    }

    fn args(config: PathBuf) -> VerifyArgs {
        VerifyArgs {
            config,
            data: None,
            encryptkey: None,
            query: None,
        }
    }

    #[test]
    fn test_open_from_fields() {
        let ws = Workspace::new();
        let sent = ws.gateway_client().build_request(&callback()).unwrap();
        let mut args = args(ws.config_path.clone());
        args.data = Some(sent.data);
        args.encryptkey = Some(sent.encryptkey);

        let params = open(&ws.merchant_client(), &args).unwrap();
        assert_eq!(params, callback());
    }

    #[test]
    fn test_open_from_query() {
        let ws = Workspace::new();
        let sent = ws.gateway_client().build_request(&callback()).unwrap();
        let mut args = args(ws.config_path.clone());
        args.query = Some(to_query_string(&sent));

        let params = open(&ws.merchant_client(), &args).unwrap();
        assert_eq!(params.get("status"), Some(&ParamValue::from(1)));
    }

    #[test]
    fn test_callback_signed_by_merchant_rejected() {
        let ws = Workspace::new();
        // Encrypted for the gateway, signed by the merchant: wrong direction.
        let sent = ws.merchant_client().build_request(&callback()).unwrap();
        let mut args = args(ws.config_path.clone());
        args.query = Some(to_query_string(&sent));

        let err = open(&ws.merchant_client(), &args).unwrap_err();
        assert!(err.to_string().starts_with("callback rejected"));
    }

    #[test]
    fn test_missing_inputs() {
        let ws = Workspace::new();
        let err = open(&ws.merchant_client(), &args(ws.config_path.clone())).unwrap_err();
        assert!(err.to_string().contains("--query"));
    }
}
