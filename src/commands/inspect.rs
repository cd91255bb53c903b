//! Inspect command implementation

use crate::commands::password::resolve_password;
use anyhow::Context;
use p12_installer::cert_ops::decode_bundle;
use p12_installer::cli::InspectArgs;
use p12_installer::output::{print_certificate, print_header, print_json, InspectJson};

/// Run the inspect command
pub fn run_inspect(args: &InspectArgs) -> anyhow::Result<()> {
    let file = &args.target.file;
    let data =
        std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let password = resolve_password(file, args.target.password.as_deref(), false)?;

    let bundle = decode_bundle(&data, &password)?;
    let leaf = bundle.leaf_validity()?;
    let chain = bundle.chain_validity()?;

    if args.json {
        return print_json(&InspectJson {
            file,
            certificate: &leaf,
            chain: &chain,
        });
    }

    print_header(&format!("PKCS#12 Bundle: {}", file.display()));
    print_certificate("Certificate", &leaf);
    for (i, cert) in chain.iter().enumerate() {
        println!();
        print_certificate(&format!("Chain [{}]", i), cert);
    }
    Ok(())
}
