//! `interval` field parsing.
//!
//! Accepts whole or fractional seconds as a number, or a string of
//! `<number><unit>` segments such as `"10ms"`, `"1m30s"` or `"1.5h"`.
//! Units: `ns`, `us` (`µs`), `ms`, `s`, `m`, `h`. A bare `"0"` is zero.

use std::time::Duration;

use serde::{de, Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawInterval {
    Secs(u64),
    FracSecs(f64),
    Text(String),
}

pub fn deserialize<'de, D>(d: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    match RawInterval::deserialize(d)? {
        RawInterval::Secs(s) => Ok(Duration::from_secs(s)),
        RawInterval::FracSecs(s) => Duration::try_from_secs_f64(s)
            .map_err(|e| de::Error::custom(format!("invalid interval {s}: {e}"))),
        RawInterval::Text(s) => parse(&s).map_err(de::Error::custom),
    }
}

pub fn parse(input: &str) -> Result<Duration, String> {
    let s = input.trim();
    if s.is_empty() {
        return Err("empty interval".into());
    }
    if s == "0" {
        return Ok(Duration::ZERO);
    }

    let mut nanos = 0f64;
    let mut rest = s;
    while !rest.is_empty() {
        let num_end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (num, tail) = rest.split_at(num_end);
        if num.is_empty() {
            return Err(format!("invalid interval {input:?}: expected a number"));
        }
        let value: f64 = num
            .parse()
            .map_err(|_| format!("invalid interval {input:?}: bad number {num:?}"))?;

        let unit_end = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_end);
        let scale = match unit {
            "ns" => 1.0,
            "us" | "µs" | "μs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            "" => return Err(format!("invalid interval {input:?}: missing unit")),
            other => return Err(format!("invalid interval {input:?}: unknown unit {other:?}")),
        };

        nanos += value * scale;
        rest = tail;
    }

    if !nanos.is_finite() || nanos > u64::MAX as f64 {
        return Err(format!("invalid interval {input:?}: out of range"));
    }
    Ok(Duration::from_nanos(nanos.round() as u64))
}
