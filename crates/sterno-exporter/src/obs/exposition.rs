//! Text exposition formats for registry snapshots.

use std::fmt::Write;

use sterno_core::MetricSample;

pub const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";
pub const OPENMETRICS_CONTENT_TYPE: &str =
    "application/openmetrics-text; version=1.0.0; charset=utf-8";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Prometheus,
    OpenMetrics,
}

impl Format {
    /// OpenMetrics when the client accepts it, Prometheus text otherwise.
    pub fn negotiate(accept: Option<&str>) -> Self {
        match accept {
            Some(a) if a.contains("application/openmetrics-text") => Format::OpenMetrics,
            _ => Format::Prometheus,
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Format::Prometheus => PROMETHEUS_CONTENT_TYPE,
            Format::OpenMetrics => OPENMETRICS_CONTENT_TYPE,
        }
    }
}

/// Prometheus spelling of special float values.
fn format_value(v: f64) -> String {
    if v.is_nan() {
        "NaN".into()
    } else if v == f64::INFINITY {
        "+Inf".into()
    } else if v == f64::NEG_INFINITY {
        "-Inf".into()
    } else {
        v.to_string()
    }
}

fn escape_help(h: &str, format: Format) -> String {
    let s = h.replace('\\', "\\\\").replace('\n', "\\n");
    match format {
        Format::Prometheus => s,
        Format::OpenMetrics => s.replace('"', "\\\""),
    }
}

pub fn render(samples: &[MetricSample], format: Format) -> String {
    let mut out = String::new();
    for s in samples {
        if let Some(help) = &s.help {
            let _ = writeln!(out, "# HELP {} {}", s.fq_name, escape_help(help, format));
        }
        let _ = writeln!(out, "# TYPE {} {}", s.fq_name, s.kind);
        let _ = writeln!(out, "{} {}", s.fq_name, format_value(s.value));
    }
    if format == Format::OpenMetrics {
        out.push_str("# EOF\n");
    }
    out
}
