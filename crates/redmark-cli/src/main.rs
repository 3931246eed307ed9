use anyhow::{Context, Result, bail};
use redmark_engine::{ChangeOutcome, RedlineApplier, diff_texts, io, parse_document, write_document};
use std::path::PathBuf;
use std::{env, process};

const USAGE: &str = "\
Usage: redmark --original-xml <document.xml> --original-text <orig.txt> \
--modified-text <modified.txt> --output <out.xml> [--author <name>] \
[--report-json <report.json>]

Generates a redlined WordprocessingML document part with true track changes
(w:ins/w:del) that can be accepted or rejected in Word's Review tab.

Options:
  -d, --original-xml   Path to the original main document part (document.xml)
  -o, --original-text  Path to the original plain-text revision
  -m, --modified-text  Path to the modified plain-text revision
  -O, --output         Path for the redlined output part
  -a, --author         Author name for track changes (default: \"Legal Review\")
      --report-json    Also write a machine-readable application report
  -h, --help           Show this help";

struct Args {
    original_xml: PathBuf,
    original_text: PathBuf,
    modified_text: PathBuf,
    output: PathBuf,
    author: String,
    report_json: Option<PathBuf>,
}

fn parse_args() -> Result<Args> {
    let mut original_xml = None;
    let mut original_text = None;
    let mut modified_text = None;
    let mut output = None;
    let mut author = "Legal Review".to_string();
    let mut report_json = None;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--original-xml" | "-d" => original_xml = Some(PathBuf::from(value(&mut args, &arg)?)),
            "--original-text" | "-o" => original_text = Some(PathBuf::from(value(&mut args, &arg)?)),
            "--modified-text" | "-m" => modified_text = Some(PathBuf::from(value(&mut args, &arg)?)),
            "--output" | "-O" => output = Some(PathBuf::from(value(&mut args, &arg)?)),
            "--author" | "-a" => author = value(&mut args, &arg)?,
            "--report-json" => report_json = Some(PathBuf::from(value(&mut args, &arg)?)),
            "--help" | "-h" => {
                println!("{USAGE}");
                process::exit(0);
            }
            other => bail!("unknown argument: {other}\n\n{USAGE}"),
        }
    }

    let (Some(original_xml), Some(original_text), Some(modified_text), Some(output)) =
        (original_xml, original_text, modified_text, output)
    else {
        bail!("--original-xml, --original-text, --modified-text, and --output are required\n\n{USAGE}");
    };

    Ok(Args {
        original_xml,
        original_text,
        modified_text,
        output,
        author,
        report_json,
    })
}

fn value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    args.next().with_context(|| format!("missing value for {flag}"))
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env().init();
    let args = parse_args()?;

    let original_text = io::read_file(&args.original_text)
        .with_context(|| format!("reading {}", args.original_text.display()))?;
    let modified_text = io::read_file(&args.modified_text)
        .with_context(|| format!("reading {}", args.modified_text.display()))?;

    println!("Analyzing changes...");
    let changes = diff_texts(&original_text, &modified_text);

    if changes.is_empty() {
        println!("No changes detected between original and modified versions.");
        io::copy_file(&args.original_xml, &args.output)
            .with_context(|| format!("copying original to {}", args.output.display()))?;
        println!("Copied original to: {}", args.output.display());
        return Ok(());
    }
    println!("Found {} change(s) to apply.", changes.len());

    let document_xml = io::read_file(&args.original_xml)
        .with_context(|| format!("reading {}", args.original_xml.display()))?;
    let mut document = parse_document(&document_xml)
        .with_context(|| format!("parsing {}", args.original_xml.display()))?;

    let mut applier = RedlineApplier::new(args.author.as_str());
    let report = applier.apply_all(&mut document, &changes);
    document.enable_track_changes();

    for entry in &report.changes {
        match &entry.outcome {
            ChangeOutcome::Applied => println!(
                "  Applied: '{}' -> '{}'",
                entry.change.old_preview(),
                entry.change.new_preview()
            ),
            ChangeOutcome::NotFound => println!(
                "  Warning: could not find '{}' in document",
                entry.change.old_preview()
            ),
            ChangeOutcome::Skipped { reason } => println!(
                "  Skipped insertion ({reason}): '{}'",
                entry.change.new_preview()
            ),
        }
    }

    io::write_file(&args.output, &write_document(&document))
        .with_context(|| format!("writing {}", args.output.display()))?;

    if let Some(path) = &args.report_json {
        let json = serde_json::to_string_pretty(&report).context("serializing report")?;
        io::write_file(path, &json).with_context(|| format!("writing {}", path.display()))?;
    }

    println!();
    println!("Redlined document saved to: {}", args.output.display());
    println!("  Changes applied: {}/{}", report.applied, report.total_changes);
    println!("  Author: {}", args.author);
    Ok(())
}
