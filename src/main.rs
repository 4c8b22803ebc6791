use anyhow::Result;
use clap::Parser;
use placeholder_icons::{
    capability,
    font::FontSource,
    icon_gen::{self, Outcome},
    manifest::ManifestIcons,
};
use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

#[derive(Debug, Parser)]
#[clap(
    name = "placeholder-icons",
    about = "Generate placeholder icons (16, 32, 48, 128 px) for the browser extension"
)]
struct Args {
    /// Output directory.
    #[clap(short, long, value_name = "DIR", default_value = icon_gen::DEFAULT_OUTPUT_DIR)]
    output: PathBuf,

    /// TrueType/OpenType font for the label. Defaults to a system font, then a built-in face.
    #[clap(long, value_name = "PATH")]
    font: Option<PathBuf>,
}

fn main() -> Result<ExitCode> {
    env_logger::init();
    let args = Args::parse();

    let capability = capability::detect();
    let fonts = FontSource::discover(args.font.as_deref());
    log::debug!(
        "Label face: {}",
        if fonts.is_scalable() { "scalable" } else { "built-in bitmap" }
    );

    let outcome = icon_gen::run(&capability, &fonts, &args.output);
    report(&outcome, &args.output)?;

    Ok(ExitCode::from(outcome.exit_code()))
}

fn report(outcome: &Outcome, out_dir: &Path) -> Result<()> {
    match outcome {
        Outcome::Created(icons) => {
            println!("\n✓ All icons created successfully in {}", out_dir.display());
            println!("Add these entries to manifest.json to use them:");
            println!("{}", ManifestIcons::from_icons(out_dir, icons).to_json()?);
        }
        Outcome::Unavailable { reason } => {
            println!("✗ {} ({reason})", icon_gen::MISSING_CAPABILITY);
            println!("  {}", icon_gen::INSTALL_HINT);
            println!("\nAlternatively, create icons manually:");
            for (i, step) in outcome.remediation().iter().enumerate() {
                println!("{}. {step}", i + 1);
            }
        }
        Outcome::Failed(err) => {
            println!("✗ {err}");
            let written = outcome.created();
            if !written.is_empty() {
                println!("  {} icon(s) were written before the failure", written.len());
            }
            for line in outcome.remediation() {
                println!("{line}");
            }
        }
    }
    Ok(())
}
