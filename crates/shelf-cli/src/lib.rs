use shelf_services::ReconcileReport;

/// Human-readable summary of a reconciliation pass.
pub fn format_report(report: &ReconcileReport, removal_requested: bool) -> String {
    let mut out = format!(
        "stored objects: {}\nrecords: {}\norphaned objects: {}\ndangling records: {}\n",
        report.stored_objects,
        report.records,
        report.orphaned_objects.len(),
        report.dangling_records.len(),
    );

    for filename in &report.orphaned_objects {
        out.push_str(&format!("  orphan   {}\n", filename));
    }
    for url in &report.dangling_records {
        out.push_str(&format!("  dangling {}\n", url));
    }

    if removal_requested {
        out.push_str(&format!(
            "removed orphans: {} (failed: {})\n",
            report.removed_orphans, report.failed_removals
        ));
    } else if !report.orphaned_objects.is_empty() {
        out.push_str("re-run with --delete to remove orphaned objects\n");
    }

    out
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
