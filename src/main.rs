use anyhow::{bail, Context, Result};
use bronze_ingest::{
    config::{Settings, DEFAULT_CONFIG},
    duck::{self, DuckConnection},
    logging, IngestReport, IngestionEngine, JobSummary,
};
use std::{env, fs, path::PathBuf};
use tracing::{error, info, warn};

fn main() -> Result<()> {
    // ─── 1) args + settings ──────────────────────────────────────────
    let mut config_path = PathBuf::from(DEFAULT_CONFIG);
    let mut force_refresh = false;
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--refresh" => force_refresh = true,
            "-h" | "--help" => {
                println!("usage: bronze-ingest [CONFIG] [--refresh]");
                return Ok(());
            }
            other if other.starts_with('-') => bail!("unknown flag {}", other),
            other => config_path = PathBuf::from(other),
        }
    }

    let settings = Settings::load(&config_path)?.with_env_overrides();

    // ─── 2) init logging ─────────────────────────────────────────────
    logging::init_logging(&settings.log_level);
    info!(config = %config_path.display(), jobs = settings.jobs.len(), "startup");

    // ─── 3) open database ────────────────────────────────────────────
    fs::create_dir_all(&settings.data_dir)
        .with_context(|| format!("creating data dir {}", settings.data_dir.display()))?;
    let conn = duck::open_in_dir(&settings.data_dir, &settings.database_file)
        .with_context(|| format!("opening {}", settings.database_path().display()))?;

    // ─── 4) run jobs ─────────────────────────────────────────────────
    let summary = run_jobs(&settings, &conn, force_refresh);
    let failures = summary.iter().filter(|s| s.is_failed()).count();

    // ─── 5) close + summary ──────────────────────────────────────────
    conn.close().context("closing database")?;

    println!("{}", serde_json::to_string_pretty(&summary)?);
    if failures > 0 {
        bail!("{} of {} jobs failed", failures, settings.jobs.len());
    }
    info!("all done");
    Ok(())
}

/// Run every configured job against `conn`; a failing job does not stop the others.
fn run_jobs(settings: &Settings, conn: &DuckConnection, force_refresh: bool) -> Vec<JobSummary> {
    let mut summary = Vec::with_capacity(settings.jobs.len());

    for job in &settings.jobs {
        let engine = IngestionEngine::new(settings.spec_for(job));
        let table = engine.spec().qualified_name();
        let refresh = force_refresh || job.refresh;

        let result = IngestReport::run(engine.spec(), || {
            if refresh {
                engine.refresh(conn)
            } else {
                engine.ingest(conn)
            }
        });

        match result {
            Ok(report) => {
                info!(
                    %table,
                    outcome = ?report.outcome,
                    elapsed_ms = report.elapsed().num_milliseconds(),
                    "job finished"
                );
                // the table is in place; a failed preview does not undo that
                if let Err(e) = log_table(&engine, conn, settings.preview_rows) {
                    warn!(%table, error = %e, "could not preview table");
                }
                summary.push(JobSummary::Finished(report));
            }
            Err(e) => {
                summary.push(JobSummary::failed(engine.spec(), &e));
                error!(%table, "job failed: {:#}", anyhow::Error::from(e));
            }
        }
    }

    summary
}

/// Log a preview and the column layout of the freshly ingested table.
fn log_table(
    engine: &IngestionEngine,
    conn: &DuckConnection,
    preview_rows: usize,
) -> bronze_ingest::IngestResult<()> {
    let table = engine.spec().qualified_name();

    let preview = engine.preview_rows_limit(conn, preview_rows)?;
    info!(%table, columns = ?preview.columns, "preview");
    for row in &preview.rows {
        let cells: Vec<String> = row.iter().map(ToString::to_string).collect();
        info!(%table, "  {}", cells.join(" | "));
    }

    for col in engine.table_schema(conn)? {
        info!(
            %table,
            column = %col.name,
            data_type = %col.data_type,
            nullable = col.nullable,
            "describe"
        );
    }
    Ok(())
}
