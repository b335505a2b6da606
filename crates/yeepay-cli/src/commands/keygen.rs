//! `yeepay keygen`: Generate a merchant RSA key pair.

use clap::Args;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use yeepay_crypto::keys::{generate_key_pair, private_key_to_pem, public_key_to_pem};

pub const PRIVATE_KEY_FILE: &str = "merchant_private.pem";
pub const PUBLIC_KEY_FILE: &str = "merchant_public.pem";

#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// Output directory for the PEM files.
    #[arg(short, long, default_value = "keys")]
    pub out: PathBuf,

    /// RSA modulus size in bits.
    #[arg(short, long, default_value_t = 2048)]
    pub bits: usize,

    /// Overwrite existing key files.
    #[arg(long)]
    pub force: bool,
}

/// Generate and write the key pair, returning (private, public) paths.
pub fn write_key_pair(out: &Path, bits: usize, force: bool) -> anyhow::Result<(PathBuf, PathBuf)> {
    let private_path = out.join(PRIVATE_KEY_FILE);
    let public_path = out.join(PUBLIC_KEY_FILE);
    if !force && (private_path.exists() || public_path.exists()) {
        anyhow::bail!("key files already exist in {} (use --force to replace)", out.display());
    }

    let (private_key, public_key) = generate_key_pair(bits)?;
    std::fs::create_dir_all(out)?;
    write_private_key(&private_path, private_key_to_pem(&private_key)?.as_bytes(), force)?;
    std::fs::write(&public_path, public_key_to_pem(&public_key)?)?;

    tracing::info!(bits, path = %private_path.display(), "merchant key pair generated");
    Ok((private_path, public_path))
}

/// Write the private key, owner-only from the moment the file exists.
fn write_private_key(path: &Path, pem: &[u8], force: bool) -> std::io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true);
    if force {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;

    // An existing file keeps its old mode when truncated.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(pem)?;
    file.sync_all()
}

pub fn run(args: &KeygenArgs) -> anyhow::Result<()> {
    println!("Generating {}-bit RSA key pair...", args.bits);
    let (private_path, public_path) = write_key_pair(&args.out, args.bits, args.force)?;
    println!("  Private key: {}", private_path.display());
    println!("  Public key:  {}", public_path.display());
    println!();
    println!("Upload the public key to the Yeepay merchant console.");
    Ok(())
}
