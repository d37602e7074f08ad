//! `hdkey`: derive, re-derive and inspect extended keys from the shell.

#![forbid(unsafe_code)]

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use hdkey_bip32::extended::classify;
use hdkey_bip32::{DerivationPath, ExtendedKeyRecord, HdKey, KeyKind};
use hdkey_core::{CurveTag, KeyFamilyKind};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "hdkey",
    version,
    about = "BIP32 key derivation for secp256k1, P-256 and Ed25519"
)]
struct Args {
    /// Log filter used when RUST_LOG is unset (e.g. "debug", "hdkey_bip32=trace")
    #[arg(long = "log-level", default_value = "warn", global = true)]
    log_level: String,

    /// Print JSON instead of plain text
    #[arg(long = "json", default_value_t = false, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Derive an extended key pair from a hex seed
    Derive {
        /// secp256k1, p256 or ed25519
        #[arg(short = 'c', long = "curve", default_value = "secp256k1")]
        curve: CurveTag,

        /// Seed bytes as hex
        #[arg(short = 's', long = "seed")]
        seed: String,

        /// Derivation path, e.g. "m/44'/60'/0'/0/0"
        #[arg(short = 'p', long = "path", default_value = "m")]
        path: DerivationPath,
    },

    /// Derive a public child from an extended public key
    Public {
        /// secp256k1, p256 or ed25519
        #[arg(short = 'c', long = "curve", default_value = "secp256k1")]
        curve: CurveTag,

        /// xpub or epub to derive from
        #[arg(short = 'k', long = "key")]
        key: String,

        /// Non-hardened derivation path, e.g. "m/0/5"
        #[arg(short = 'p', long = "path")]
        path: DerivationPath,
    },

    /// Decode an extended key and print its fields
    Inspect {
        /// Extended key string
        key: String,

        /// Also validate the embedded key against this curve
        #[arg(short = 'c', long = "curve")]
        curve: Option<CurveTag>,
    },
}

#[derive(Serialize, Debug)]
struct DerivedKey {
    curve: CurveTag,
    path: String,
    depth: u8,
    child_index: u32,
    parent_fingerprint: String,
    fingerprint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    extended_private_key: Option<String>,
    extended_public_key: String,
    public_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    delta: Option<String>,
}

#[derive(Serialize, Debug)]
struct InspectedKey {
    version: String,
    family: Option<&'static str>,
    kind: Option<&'static str>,
    depth: u8,
    parent_fingerprint: String,
    child_index: u32,
    hardened: bool,
    chain_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    public_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    valid_for: Option<CurveTag>,
}

fn describe(key: &HdKey, path: &DerivationPath, delta: Option<[u8; 32]>) -> Result<DerivedKey> {
    let extended_private_key = if key.has_private_key() {
        Some(key.to_extended_private_key()?)
    } else {
        None
    };

    Ok(DerivedKey {
        curve: key.curve(),
        path: path.to_string(),
        depth: key.depth(),
        child_index: key.child_index(),
        parent_fingerprint: format!("{:08x}", key.parent_fingerprint()),
        fingerprint: format!("{:08x}", key.fingerprint()),
        extended_private_key,
        extended_public_key: key.to_extended_public_key(),
        public_key: hex::encode(key.public_key()),
        delta: delta.map(hex::encode),
    })
}

fn family_name(family: KeyFamilyKind) -> &'static str {
    match family {
        KeyFamilyKind::Weierstrass => "weierstrass",
        KeyFamilyKind::Edwards => "edwards",
    }
}

fn run_derive(curve: CurveTag, seed: &str, path: &DerivationPath) -> Result<DerivedKey> {
    let seed = hex::decode(seed.trim()).context("seed must be hex")?;
    debug!(%curve, seed_len = seed.len(), %path, "deriving from seed");

    let master = HdKey::from_seed(curve, &seed).context("seed does not produce a valid master key")?;
    let key = master
        .derive_path(path)
        .with_context(|| format!("failed to derive {path}"))?;

    describe(&key, path, None)
}

fn run_public(curve: CurveTag, encoded: &str, path: &DerivationPath) -> Result<DerivedKey> {
    let parent = HdKey::from_extended_public_key(curve, encoded.trim())
        .with_context(|| format!("not a valid {curve} extended public key"))?;
    let child = parent
        .derive_public_path(path)
        .with_context(|| format!("failed to derive {path}"))?;

    describe(&child.key, path, Some(child.delta))
}

fn run_inspect(encoded: &str, curve: Option<CurveTag>) -> Result<InspectedKey> {
    let encoded = encoded.trim();
    let record = ExtendedKeyRecord::decode(encoded).context("not a valid extended key")?;
    let kind = classify(record.version);

    let valid_for = match curve {
        Some(curve) => {
            match kind {
                Some((family, _)) if family != curve.family() => {
                    bail!("{curve} keys use a different version than {:#010x}", record.version)
                }
                Some((_, KeyKind::Private)) => {
                    HdKey::from_extended_private_key(curve, encoded)
                        .with_context(|| format!("invalid {curve} private key"))?;
                }
                Some((_, KeyKind::Public)) => {
                    HdKey::from_extended_public_key(curve, encoded)
                        .with_context(|| format!("invalid {curve} public key"))?;
                }
                None => bail!("unknown version {:#010x}", record.version),
            }
            Some(curve)
        }
        None => None,
    };

    let public_key = match kind {
        Some((_, KeyKind::Public)) => Some(hex::encode(record.key.as_bytes())),
        _ => None,
    };

    Ok(InspectedKey {
        version: format!("{:#010x}", record.version),
        family: kind.map(|(family, _)| family_name(family)),
        kind: kind.map(|(_, kind)| kind.name()),
        depth: record.depth,
        parent_fingerprint: format!("{:08x}", record.parent_fingerprint),
        child_index: record.child_index,
        hardened: hdkey_bip32::path::is_hardened(record.child_index),
        chain_code: hex::encode(record.chain_code),
        public_key,
        valid_for,
    })
}

fn print_derived(key: &DerivedKey) {
    println!("curve:              {}", key.curve);
    println!("path:               {}", key.path);
    println!("depth:              {}", key.depth);
    println!("child index:        {}", key.child_index);
    println!("parent fingerprint: {}", key.parent_fingerprint);
    println!("fingerprint:        {}", key.fingerprint);
    if let Some(xprv) = &key.extended_private_key {
        println!("private:            {}", xprv);
    }
    println!("public:             {}", key.extended_public_key);
    println!("public key:         {}", key.public_key);
    if let Some(delta) = &key.delta {
        println!("delta:              {}", delta);
    }
}

fn print_inspected(key: &InspectedKey) {
    println!("version:            {}", key.version);
    println!("family:             {}", key.family.unwrap_or("unknown"));
    println!("kind:               {}", key.kind.unwrap_or("unknown"));
    println!("depth:              {}", key.depth);
    println!("parent fingerprint: {}", key.parent_fingerprint);
    println!(
        "child index:        {}{}",
        key.child_index & !hdkey_bip32::HARDENED,
        if key.hardened { "'" } else { "" }
    );
    println!("chain code:         {}", key.chain_code);
    if let Some(public_key) = &key.public_key {
        println!("public key:         {}", public_key);
    }
    if let Some(curve) = key.valid_for {
        println!("valid for:          {}", curve);
    }
}

fn emit<T: Serialize>(value: &T, json: bool, plain: impl FnOnce(&T)) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        plain(value);
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!("hdkey v{}", env!("CARGO_PKG_VERSION"));

    match &args.command {
        Command::Derive { curve, seed, path } => {
            let key = run_derive(*curve, seed, path)?;
            emit(&key, args.json, print_derived)
        }
        Command::Public { curve, key, path } => {
            let key = run_public(*curve, key, path)?;
            emit(&key, args.json, print_derived)
        }
        Command::Inspect { key, curve } => {
            let key = run_inspect(key, *curve)?;
            emit(&key, args.json, print_inspected)
        }
    }
}
