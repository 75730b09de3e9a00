use anyhow::Result;
use chrono::Local;
use clap::Parser;
use console::style;
use prettytable::{format, Cell, Row, Table};
use std::time::Instant;

use product_image_exporter::cli::Args;
use product_image_exporter::export::ExportPaths;
use product_image_exporter::image_processing::{
    discover_images, process_and_export, RunSummary, Selection,
};
use product_image_exporter::json_output::{JsonMessage, JsonNotifier};
use product_image_exporter::notify::ConsoleNotifier;
use product_image_exporter::utils::{
    create_progress_bar, format_duration, validate_inputs, verbose_println,
};

fn main() -> Result<()> {
    let args = Args::parse();

    if !args.json_progress {
        println!("{}", style("Product Image Exporter").bold().blue());
        println!("{}", style("WebP conversion and img_product exports").dim());
        println!();
    }

    validate_inputs(&args)?;

    let selection = Selection::new(discover_images(&args.input_paths)?);
    let paths = ExportPaths::default();

    if args.json_progress {
        run_json(&selection, &paths);
    } else {
        run_interactive(&args, &selection, &paths);
    }

    Ok(())
}

/// Machine-readable run: every event becomes one JSON line on stdout
fn run_json(selection: &Selection, paths: &ExportPaths) {
    let date = Local::now().date_naive();
    let mut notifier = JsonNotifier;

    let summary = process_and_export(selection, paths, date, &mut notifier, |p| {
        JsonMessage::progress(p.completed, p.total, p.current.display().to_string());
    });

    let Some(summary) = summary else {
        JsonMessage::summary(0, 0, 0, 0, 0.0);
        return;
    };

    for result in &summary.outcome.converted {
        JsonMessage::file_completed(result).emit();
    }
    for failure in &summary.outcome.failures {
        JsonMessage::file_failed(failure).emit();
    }
    for report in &summary.exports {
        JsonMessage::export(report).emit();
    }

    JsonMessage::summary(
        selection.len(),
        summary.outcome.converted.len(),
        summary.outcome.failures.len(),
        summary.exports.iter().filter(|r| r.is_ok()).count(),
        summary.outcome.duration.as_secs_f64(),
    );
}

fn run_interactive(args: &Args, selection: &Selection, paths: &ExportPaths) {
    let start_time = Instant::now();
    let date = Local::now().date_naive();

    verbose_println(
        args.verbose,
        &format!("Selected {} image(s)", selection.len()),
    );
    verbose_println(
        args.verbose,
        &format!("Output directory: {}", paths.image_dir.display()),
    );

    let progress = create_progress_bar(selection.len() as u64);
    progress.set_message("Converting images");
    let mut notifier = ConsoleNotifier::with_progress(progress.clone());

    let summary = process_and_export(selection, paths, date, &mut notifier, |p| {
        progress.set_position(p.completed as u64);
        let name = p
            .current
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if args.verbose {
            let status = if p.succeeded { "converted" } else { "failed" };
            progress.suspend(|| {
                verbose_println(
                    true,
                    &format!("[{}/{}] {} {}", p.completed, p.total, name, status),
                )
            });
        }
        progress.set_message(name);
    });

    let Some(summary) = summary else {
        progress.finish_and_clear();
        return;
    };
    progress.finish_with_message("✓ Conversion complete");

    println!();
    print_summary(args, &summary);

    println!();
    println!("{}", style("Performance:").bold().blue());
    println!(
        "  Total processing time: {}",
        style(format_duration(start_time.elapsed())).bold()
    );
}

fn print_summary(args: &Args, summary: &RunSummary) {
    let outcome = &summary.outcome;

    println!("{}", style("Results Summary:").bold().green());
    println!(
        "  Converted to WebP: {}",
        style(outcome.converted.len()).bold().green()
    );
    if !outcome.failures.is_empty() {
        println!("  Failed: {}", style(outcome.failures.len()).bold().red());
    }

    if args.verbose && !outcome.converted.is_empty() {
        println!();
        println!("{}", style("Converted images:").bold().blue());
        for (i, result) in outcome.converted.iter().enumerate() {
            let source = result
                .source_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "unknown".to_string());
            println!(
                "  {}: {} → {}",
                style(format!("#{}", i + 1)).dim(),
                style(source).bold(),
                style(result.output_path.display()).cyan()
            );
        }
    }

    if !summary.exports.is_empty() {
        println!();
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BOX_CHARS);
        table.add_row(Row::new(vec![
            Cell::new("Export"),
            Cell::new("File"),
            Cell::new("Records"),
            Cell::new("Status"),
        ]));

        for report in &summary.exports {
            let (records, status) = match &report.outcome {
                Ok(records) => (records.to_string(), "✓ written".to_string()),
                Err(error) => ("-".to_string(), format!("✗ {}", error)),
            };
            table.add_row(Row::new(vec![
                Cell::new(report.kind.label()),
                Cell::new(&report.path.display().to_string()),
                Cell::new(&records),
                Cell::new(&status),
            ]));
        }

        table.printstd();
    } else {
        println!();
        println!(
            "{}",
            style("No image was converted; export files were left untouched").yellow()
        );
    }

    if !outcome.failures.is_empty() {
        println!();
        println!("{}", style("Errors encountered:").bold().red());
        for (i, failure) in outcome.failures.iter().enumerate() {
            println!(
                "  {}: {} - {}",
                style(format!("#{}", i + 1)).dim(),
                style(failure.source.display()).bold().red(),
                failure.error
            );
        }
    }
}
