//! Report shapes and the classifier that extracts them from tokens.

use std::str::FromStr;

use bender_frame::{kind_name, ANALOG, FAULT, STATUS};

use crate::error::ReportError;

/// Minimum tokens for a status report: keyword plus six fields.
const STATUS_MIN_TOKENS: usize = 7;

/// Minimum tokens for an analog report: keyword plus count.
const ANALOG_MIN_TOKENS: usize = 2;

/// Raw analog reading at full scale.
pub const ANALOG_FULL_SCALE_COUNTS: u16 = 1023;

/// Voltage at full scale.
pub const ANALOG_FULL_SCALE_VOLTS: f64 = 5.0;

/// `BGF <unit> <status> <period_us> <duty_us> <duty_ppt> <kohm>`
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    /// Unit number, 0-3 on current hardware. Not range-checked here.
    pub unit_id: u32,
    /// 1 for good, 0 for fault.
    pub status: u8,
    /// Period of the last PWM cycle. Zero means a DC level (short).
    pub period_us: u32,
    /// High time of the last PWM cycle.
    pub duty_us: u32,
    /// Duty cycle in parts per thousand.
    pub duty_ratio_ppt: u32,
    /// Computed ground-fault resistance.
    pub resistance_kohm: f64,
}

impl StatusReport {
    pub fn is_ok(&self) -> bool {
        self.status == 1
    }

    /// No PWM period was measured: the line is held at a DC level.
    pub fn is_dc(&self) -> bool {
        self.period_us == 0
    }
}

/// `AIN <count> <ain0> <ain1> ...`
///
/// `readings` may be shorter than `count` when the line is short; that is
/// accepted as-is. Each reading present must be a `u16`: one bad reading
/// fails the whole report with [`ReportError::InvalidField`] rather than
/// dropping or zeroing that channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalogReport {
    pub count: usize,
    pub readings: Vec<u16>,
}

impl AnalogReport {
    /// Readings converted to volts.
    pub fn volts(&self) -> impl Iterator<Item = f64> + '_ {
        self.readings.iter().map(|&raw| counts_to_volts(raw))
    }

    /// True when every declared channel was present on the line.
    pub fn is_complete(&self) -> bool {
        self.readings.len() == self.count
    }
}

/// Convert a raw 10-bit analog reading to volts.
pub fn counts_to_volts(raw: u16) -> f64 {
    f64::from(raw) * ANALOG_FULL_SCALE_VOLTS / f64::from(ANALOG_FULL_SCALE_COUNTS)
}

/// `GFS <free text>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaultReport {
    /// Tokens after the keyword, joined with single spaces.
    pub text: String,
}

/// A validated line whose keyword is unknown or that has too few tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnrecognizedReport {
    pub keyword: Option<String>,
    pub token_count: usize,
}

/// One classified message.
#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    Status(StatusReport),
    Analog(AnalogReport),
    Fault(FaultReport),
    Unrecognized(UnrecognizedReport),
}

impl Report {
    /// Short name of the report kind, for logs and output.
    pub fn kind(&self) -> &'static str {
        match self {
            Report::Status(_) => kind_name(STATUS),
            Report::Analog(_) => kind_name(ANALOG),
            Report::Fault(_) => kind_name(FAULT),
            Report::Unrecognized(_) => "unrecognized",
        }
    }
}

/// Classify tokens by keyword and extract the typed report.
///
/// Pure: the result depends only on the tokens. A field that does not parse
/// fails the whole message with [`ReportError::InvalidField`].
pub fn classify<S: AsRef<str>>(tokens: &[S]) -> Result<Report, ReportError> {
    let keyword: Option<&str> = tokens.first().map(|t| t.as_ref());

    match keyword {
        Some(STATUS) if tokens.len() >= STATUS_MIN_TOKENS => {
            let field = |idx: usize| tokens[idx].as_ref();
            Ok(Report::Status(StatusReport {
                unit_id: parse_field("status", "unit_id", field(1))?,
                status: parse_field("status", "status", field(2))?,
                period_us: parse_field("status", "period_us", field(3))?,
                duty_us: parse_field("status", "duty_us", field(4))?,
                duty_ratio_ppt: parse_field("status", "duty_ratio_ppt", field(5))?,
                resistance_kohm: parse_field("status", "resistance_kohm", field(6))?,
            }))
        }
        Some(ANALOG) if tokens.len() >= ANALOG_MIN_TOKENS => {
            let count: usize = parse_field("analog", "count", tokens[1].as_ref())?;
            let readings = tokens[2..]
                .iter()
                .take(count)
                .map(|t| parse_field("analog", "reading", t.as_ref()))
                .collect::<Result<Vec<u16>, _>>()?;
            Ok(Report::Analog(AnalogReport { count, readings }))
        }
        Some(FAULT) => {
            let text = tokens[1..]
                .iter()
                .map(|t| t.as_ref())
                .collect::<Vec<&str>>()
                .join(" ");
            Ok(Report::Fault(FaultReport { text }))
        }
        _ => Ok(Report::Unrecognized(UnrecognizedReport {
            keyword: keyword.map(str::to_owned),
            token_count: tokens.len(),
        })),
    }
}

fn parse_field<T: FromStr>(
    kind: &'static str,
    field: &'static str,
    value: &str,
) -> Result<T, ReportError> {
    value.parse().map_err(|_| ReportError::InvalidField {
        kind,
        field,
        value: value.to_string(),
    })
}
