// # parse_envelope - decode schema envelopes offline
//
// Reads `{"apiVersion", "kind", "resource"}` documents from the files named
// on the command line (or stdin when none is given), decodes each into its
// registered resource type and prints the typed value followed by the
// canonical envelope re-encoded from it.
//
// ```bash
// parse_envelope zone.json record.json
// echo '{"apiVersion":"zones.api.dns-platform.jp/v1","kind":"Zone"}' | parse_envelope
// ```

use anyhow::{Context as _, Result};
use dpf_core::Registry;
use std::io::Read;
use std::process::ExitCode;
use tracing::{Level, error};
use tracing_subscriber::FmtSubscriber;

fn main() -> ExitCode {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::WARN)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {e}");
        return ExitCode::from(1);
    }

    let mut registry = Registry::new();
    dpf_resources::register(&mut registry);

    let paths: Vec<String> = std::env::args().skip(1).collect();
    let mut failed = false;
    if paths.is_empty() {
        if let Err(e) = read_stdin().and_then(|bytes| show(&registry, "<stdin>", &bytes)) {
            error!("{e:#}");
            failed = true;
        }
    }
    for path in &paths {
        let outcome = std::fs::read(path)
            .with_context(|| format!("failed to read {path}"))
            .and_then(|bytes| show(&registry, path, &bytes));
        if let Err(e) = outcome {
            error!("{e:#}");
            failed = true;
        }
    }

    if failed { ExitCode::from(2) } else { ExitCode::SUCCESS }
}

fn read_stdin() -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    std::io::stdin()
        .read_to_end(&mut bytes)
        .context("failed to read stdin")?;
    Ok(bytes)
}

fn show(registry: &Registry, source: &str, bytes: &[u8]) -> Result<()> {
    let resource = registry
        .parse(bytes)
        .with_context(|| format!("{source}: invalid envelope"))?;
    let envelope = registry.to_envelope(resource.as_ref())?;

    println!("# {source}: {}/{}", resource.group(), resource.kind());
    println!("{resource:#?}");
    println!("{}", String::from_utf8_lossy(&envelope));
    Ok(())
}
