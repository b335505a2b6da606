//! `yeepay pay`: Build a mobile web-pay redirect URL.

use clap::Args;
use std::path::PathBuf;
use yeepay_core::ClientConfig;
use yeepay_sdk::{WebPayRequest, YeepayClient};

#[derive(Args, Debug)]
pub struct PayArgs {
    /// Path to the client configuration file.
    #[arg(short, long, default_value = "yeepay.toml")]
    pub config: PathBuf,

    /// Amount in fen.
    #[arg(short, long)]
    pub amount: i64,

    /// Payer identity (user ID, phone, ...).
    #[arg(long)]
    pub identity_id: String,

    /// Payer IP address.
    #[arg(long)]
    pub user_ip: String,

    /// Payer user agent.
    #[arg(long)]
    pub user_ua: String,

    /// Order ID (defaults to a fresh UUID).
    #[arg(long)]
    pub order_id: Option<String>,

    /// Transaction time, Unix seconds (defaults to now).
    #[arg(long)]
    pub transtime: Option<i64>,

    /// Product name shown on the cashier page.
    #[arg(long)]
    pub product_name: Option<String>,

    /// Server-to-server result callback URL.
    #[arg(long)]
    pub callback_url: Option<String>,
}

impl PayArgs {
    fn to_request(&self) -> WebPayRequest {
        let order_id = self
            .order_id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::now_v7().simple().to_string());
        let transtime = self.transtime.unwrap_or_else(|| chrono::Utc::now().timestamp());

        let mut request = WebPayRequest::new(
            order_id,
            transtime,
            self.amount,
            self.identity_id.as_str(),
            self.user_ip.as_str(),
            self.user_ua.as_str(),
        );
        request.productname = self.product_name.clone();
        request.callbackurl = self.callback_url.clone();
        request
    }
}

/// Build the web-pay URL with an already constructed client.
pub fn build_url(client: &YeepayClient, args: &PayArgs) -> anyhow::Result<String> {
    let request = args.to_request();
    match client.web_pay(&request)? {
        Some(url) => Ok(url),
        None => anyhow::bail!(
            "payment request rejected: orderid, transtime, amount, identityid, userip and userua are all required"
        ),
    }
}

pub fn run(args: &PayArgs) -> anyhow::Result<()> {
    let config = ClientConfig::load(&args.config)?;
    let client = YeepayClient::new(config)?;
    let url = build_url(&client, args)?;
    println!("{}", url);
    Ok(())
}
