//! `yeepay init`: Write a template client configuration.

use clap::Args;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (defaults to current directory).
    #[arg(default_value = ".")]
    pub dir: PathBuf,
}

const TEMPLATE: &str = r#"# Yeepay client configuration

# Merchant account issued by Yeepay
merchant_account = "10000000000"

# per_client: one session key for the life of the client
# per_request: a fresh session key for every request
session_key_policy = "per_client"

[keys]
merchant_private_key = { path = "keys/merchant_private.pem" }
yeepay_public_key = { path = "keys/yeepay_public.pem" }

[defaults]
currency = 156
productcatalog = "1"
identitytype = 2
terminaltype = 3
# productname = ""
# productdesc = ""
# terminalid = ""
# callbackurl = "https://shop.example.com/yeepay/callback"
# fcallbackurl = "https://shop.example.com/yeepay/return"

[endpoints]
merchant = "https://ok.yeepay.com/merchant/"
mobile = "https://ok.yeepay.com/paymobile/"
pc = "https://ok.yeepay.com/payweb/"
pay = "https://ok.yeepay.com/payapi/"
"#;

/// Write the template into `dir`, refusing to overwrite.
pub fn write_template(dir: &Path) -> anyhow::Result<PathBuf> {
    let config_path = dir.join("yeepay.toml");

    if config_path.exists() {
        anyhow::bail!("configuration file already exists at {}", config_path.display());
    }

    std::fs::create_dir_all(dir.join("keys"))?;
    std::fs::write(&config_path, TEMPLATE)?;
    Ok(config_path)
}

pub fn run(args: &InitArgs) -> anyhow::Result<()> {
    let config_path = write_template(&args.dir)?;
    println!("Initialized Yeepay client config at {}", config_path.display());
    println!("Set merchant_account and place your keys under {}.", args.dir.join("keys").display());
    println!("Run 'yeepay keygen --out {}' to create a merchant key pair.", args.dir.join("keys").display());
    Ok(())
}
