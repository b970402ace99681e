// SPDX-License-Identifier: MIT

//! Weekly retention rollup (§4.6 "Retention"): keep `keepPreviousWeeks`
//! weeks of archive files, best-effort, running in the background.

use crate::backend::NativeBackend;
use msghub_core::days_since_epoch;
use std::path::PathBuf;

/// Result of one sweep, exposed via stats (`pendingFlush`-style counters).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetentionReport {
    pub scanned: usize,
    pub removed: usize,
    pub errors: usize,
}

/// The ISO-week index of a day count since epoch. Weeks are counted from
/// the epoch rather than calendar ISO weeks — stable, monotonic, and all
/// that's needed to bucket files into "how many weeks old".
fn week_of(epoch_ms: u64) -> i64 {
    days_since_epoch(epoch_ms) / 7
}

/// Sweep `backend`'s base directory, deleting any `<ref>.<YYYYMMDD>.<ext>`
/// file whose date is older than `keep_previous_weeks` full weeks before
/// `now`. Best-effort: a single file's I/O error is counted and skipped,
/// never aborts the sweep (§4.6 "Retention runs in the background and is
/// best-effort").
pub async fn sweep(backend: &NativeBackend, now: u64, keep_previous_weeks: u32) -> RetentionReport {
    let mut report = RetentionReport::default();
    let cutoff_week = week_of(now) - keep_previous_weeks as i64;

    let mut dirs = match tokio::fs::read_dir(backend.base_dir()).await {
        Ok(d) => d,
        Err(_) => return report,
    };

    let mut source_dirs = Vec::new();
    while let Ok(Some(entry)) = dirs.next_entry().await {
        if entry.file_name() == ".probe" {
            continue;
        }
        if matches!(entry.file_type().await, Ok(ft) if ft.is_dir()) {
            source_dirs.push(entry.path());
        }
    }

    for dir in source_dirs {
        sweep_dir(&dir, cutoff_week, &mut report).await;
    }
    report
}

async fn sweep_dir(dir: &PathBuf, cutoff_week: i64, report: &mut RetentionReport) {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(e) => e,
        Err(_) => return,
    };
    while let Ok(Some(entry)) = entries.next_entry().await {
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        let Some(date) = extract_date(name) else { continue };
        report.scanned += 1;
        if file_week(&date) < cutoff_week {
            match tokio::fs::remove_file(entry.path()).await {
                Ok(()) => report.removed += 1,
                Err(_) => report.errors += 1,
            }
        }
    }
}

/// Parse the `YYYYMMDD` component out of `<ref>.<YYYYMMDD>.<ext>`.
fn extract_date(file_name: &str) -> Option<String> {
    let parts: Vec<&str> = file_name.rsplitn(3, '.').collect();
    // rsplitn gives [ext, date, ref...] reversed.
    if parts.len() < 3 {
        return None;
    }
    let date = parts[1];
    (date.len() == 8 && date.bytes().all(|b| b.is_ascii_digit())).then(|| date.to_string())
}

fn file_week(date: &str) -> i64 {
    let y: i64 = date[0..4].parse().unwrap_or(1970);
    let m: i64 = date[4..6].parse().unwrap_or(1);
    let d: i64 = date[6..8].parse().unwrap_or(1);
    // Approximate days-since-epoch from the parsed y/m/d (inverse of
    // `civil_from_days`, good enough for week bucketing purposes).
    let days = days_from_civil(y, m, d);
    days / 7
}

fn days_from_civil(y: i64, m: i64, d: i64) -> i64 {
    let y = if m <= 2 { y - 1 } else { y };
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = y - era * 400;
    let mp = if m > 2 { m - 3 } else { m + 9 };
    let doy = (153 * mp + 2) / 5 + d - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

#[cfg(test)]
#[path = "retention_tests.rs"]
mod tests;
