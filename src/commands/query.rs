use crate::database::{Database, Execution};
use crate::render::{render, RenderMode};
use anyhow::Result;
use std::io::Write;
use std::time::Instant;
use tracing::debug;

pub struct QueryExecutor;

impl QueryExecutor {
    pub fn new() -> Self {
        QueryExecutor
    }

    /// Run one statement and print its outcome. Engine and render failures
    /// are reported on `out`; only a failing `out` is returned as an error.
    pub fn execute(
        &self,
        database: &Database,
        query: &str,
        mode: RenderMode,
        out: &mut dyn Write,
    ) -> Result<()> {
        let start_time = Instant::now();
        debug!(%mode, "executing statement");

        match database.execute(query, |cursor| render(mode, cursor, &mut *out)) {
            Ok(Execution::Rows(Ok(()))) => {}
            Ok(Execution::Rows(Err(e))) => {
                writeln!(out, "{}: {}", render_failure(mode), e)?;
            }
            Ok(Execution::Changed { rows }) => {
                let duration = start_time.elapsed();
                writeln!(
                    out,
                    "Query OK, {} {} affected ({:.3} sec)",
                    rows,
                    if rows == 1 { "row" } else { "rows" },
                    duration.as_secs_f64()
                )?;
            }
            Err(e) => {
                debug!(error = %e, "statement failed");
                writeln!(out, "Query failed: {}", e)?;
            }
        }

        Ok(())
    }
}

impl Default for QueryExecutor {
    fn default() -> Self {
        Self::new()
    }
}

fn render_failure(mode: RenderMode) -> &'static str {
    match mode {
        RenderMode::Table => "Error printing table",
        RenderMode::Expanded => "Error printing expanded",
        RenderMode::Json => "JSON output error",
    }
}
