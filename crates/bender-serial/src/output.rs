use std::io::{IsTerminal, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use bender_telemetry::{Decoded, DecodeError, MonitorStats, Report};
use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

use crate::units::Gauges;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ReportBody<'a> {
    Status {
        unit_id: u32,
        status: u8,
        ok: bool,
        period_us: u32,
        duty_us: u32,
        duty_ratio_ppt: u32,
        resistance_kohm: f64,
    },
    Analog {
        count: usize,
        readings: &'a [u16],
        volts: Vec<f64>,
    },
    Fault {
        text: &'a str,
    },
    Unrecognized {
        keyword: Option<&'a str>,
        token_count: usize,
    },
}

impl<'a> From<&'a Report> for ReportBody<'a> {
    fn from(report: &'a Report) -> Self {
        match report {
            Report::Status(s) => ReportBody::Status {
                unit_id: s.unit_id,
                status: s.status,
                ok: s.is_ok(),
                period_us: s.period_us,
                duty_us: s.duty_us,
                duty_ratio_ppt: s.duty_ratio_ppt,
                resistance_kohm: s.resistance_kohm,
            },
            Report::Analog(a) => ReportBody::Analog {
                count: a.count,
                readings: &a.readings,
                volts: a.volts().collect(),
            },
            Report::Fault(f) => ReportBody::Fault { text: &f.text },
            Report::Unrecognized(u) => ReportBody::Unrecognized {
                keyword: u.keyword.as_deref(),
                token_count: u.token_count,
            },
        }
    }
}

#[derive(Serialize)]
struct ReportOutput<'a> {
    #[serde(flatten)]
    body: ReportBody<'a>,
    line: String,
    timestamp: String,
}

#[derive(Serialize)]
struct RejectOutput {
    kind: &'static str,
    error: String,
    line: Option<String>,
    timestamp: String,
}

pub fn print_report(decoded: &Decoded, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = ReportOutput {
                body: ReportBody::from(&decoded.report),
                line: decoded.line.to_string(),
                timestamp: now_unix_seconds(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["KIND", "UNIT", "DETAIL"])
                .add_row(vec![
                    decoded.report.kind().to_string(),
                    unit_column(&decoded.report),
                    detail(&decoded.report),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "kind={} unit={} {}",
                decoded.report.kind(),
                unit_column(&decoded.report),
                detail(&decoded.report)
            );
        }
        OutputFormat::Raw => {
            print_raw(decoded.line.as_bytes());
        }
    }
}

/// Print a line that failed validation. Raw output skips rejected lines.
pub fn print_rejected(err: &DecodeError, format: OutputFormat) {
    let line = err.line().map(|l| l.to_string());
    match format {
        OutputFormat::Json => {
            let out = RejectOutput {
                kind: "rejected",
                error: reason(err),
                line,
                timestamp: now_unix_seconds(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table | OutputFormat::Pretty => {
            println!(
                "kind=rejected error=\"{}\" line={}",
                reason(err),
                line.as_deref().unwrap_or("-")
            );
        }
        OutputFormat::Raw => {}
    }
}

#[derive(Serialize)]
struct SummaryOutput<'a> {
    kind: &'static str,
    lines: u64,
    status_reports: u64,
    analog_reports: u64,
    fault_reports: u64,
    unrecognized: u64,
    checksum_failures: u64,
    field_errors: u64,
    overflows: u64,
    unpublished: u64,
    units: Vec<UnitOutput<'a>>,
}

#[derive(Serialize)]
struct UnitOutput<'a> {
    id: u32,
    name: &'a str,
    updates: u64,
    status: Option<f64>,
    resistance_kohm: Option<f64>,
}

/// Counters and the last published value per unit.
pub fn print_summary(stats: &MonitorStats, gauges: &Gauges, format: OutputFormat) {
    let units: Vec<UnitOutput<'_>> = gauges
        .iter()
        .map(|g| UnitOutput {
            id: g.id,
            name: &g.name,
            updates: g.resistance.updates(),
            status: g.status.value(),
            resistance_kohm: g.resistance.value(),
        })
        .collect();

    match format {
        OutputFormat::Json => {
            let out = SummaryOutput {
                kind: "summary",
                lines: stats.lines,
                status_reports: stats.status_reports,
                analog_reports: stats.analog_reports,
                fault_reports: stats.fault_reports,
                unrecognized: stats.unrecognized,
                checksum_failures: stats.checksum_failures,
                field_errors: stats.field_errors,
                overflows: stats.overflows,
                unpublished: stats.unpublished,
                units,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["UNIT", "NAME", "UPDATES", "STATUS", "RESISTANCE (kOhm)"]);
            for unit in &units {
                table.add_row(vec![
                    unit.id.to_string(),
                    unit.name.to_string(),
                    unit.updates.to_string(),
                    optional(unit.status),
                    optional(unit.resistance_kohm),
                ]);
            }
            println!("{table}");
            println!(
                "lines={} rejected={} overflows={} unpublished={}",
                stats.lines,
                stats.rejected(),
                stats.overflows,
                stats.unpublished
            );
        }
        OutputFormat::Pretty => {
            for unit in &units {
                println!(
                    "unit={} name={} updates={} status={} resistance_kohm={}",
                    unit.id,
                    unit.name,
                    unit.updates,
                    optional(unit.status),
                    optional(unit.resistance_kohm)
                );
            }
            println!(
                "lines={} rejected={} overflows={} unpublished={}",
                stats.lines,
                stats.rejected(),
                stats.overflows,
                stats.unpublished
            );
        }
        OutputFormat::Raw => {}
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.write_all(b"\n");
    let _ = out.flush();
}

fn unit_column(report: &Report) -> String {
    match report {
        Report::Status(s) => s.unit_id.to_string(),
        _ => "-".to_string(),
    }
}

fn detail(report: &Report) -> String {
    match report {
        Report::Status(s) => format!(
            "status={} period_us={} duty_us={} duty_ppt={} resistance_kohm={}",
            if s.is_ok() { "ok" } else { "fault" },
            s.period_us,
            s.duty_us,
            s.duty_ratio_ppt,
            s.resistance_kohm
        ),
        Report::Analog(a) => {
            let volts: Vec<String> = a.volts().map(|v| format!("{v:.3}")).collect();
            format!("count={} volts=[{}]", a.count, volts.join(", "))
        }
        Report::Fault(f) => format!("text=\"{}\"", f.text),
        Report::Unrecognized(u) => format!(
            "keyword={} tokens={}",
            u.keyword.as_deref().unwrap_or("-"),
            u.token_count
        ),
    }
}

/// The underlying cause without the line; the line is printed separately.
fn reason(err: &DecodeError) -> String {
    match err {
        DecodeError::Framing(source) | DecodeError::Checksum { source, .. } => source.to_string(),
        DecodeError::Field { source, .. } => source.to_string(),
    }
}

fn optional(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
