//! Clock-unit duration notation.
//!
//! Durations render as a sequence of unit-tagged components, largest unit
//! first: `5h0m0s`, `1m30s`, `300ms`, `1.5µs`. Sub-second durations pick
//! the largest of `ms`/`µs`/`ns` with a non-zero integer part and carry a
//! trimmed fraction; anything of a second or more always ends in `s`, with
//! `m` and `h` components appearing once the magnitude requires them.
//! Parsing accepts an optional sign followed by one or more decimal
//! numbers (with optional fraction) each tagged with a unit out of
//! `ns`, `us`, `µs`, `μs`, `ms`, `s`, `m`, `h`.

use chrono::TimeDelta;

use crate::{Error, Result};

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Formats a duration in clock-unit notation.
pub(crate) fn format(d: TimeDelta) -> String {
    let total = i128::from(d.num_seconds()) * NANOS_PER_SEC as i128 + i128::from(d.subsec_nanos());
    if total == 0 {
        return "0s".to_string();
    }

    let mut out = String::new();
    if total < 0 {
        out.push('-');
    }
    let u = total.unsigned_abs();

    if u < NANOS_PER_SEC {
        // Sub-second: one unit with an optional trimmed fraction.
        if u < 1_000 {
            out.push_str(&u.to_string());
            out.push_str("ns");
        } else if u < 1_000_000 {
            out.push_str(&(u / 1_000).to_string());
            push_frac(&mut out, u % 1_000, 3);
            out.push_str("µs");
        } else {
            out.push_str(&(u / 1_000_000).to_string());
            push_frac(&mut out, u % 1_000_000, 6);
            out.push_str("ms");
        }
        return out;
    }

    let secs = u / NANOS_PER_SEC;
    if secs >= 3600 {
        out.push_str(&(secs / 3600).to_string());
        out.push('h');
    }
    if secs >= 60 {
        out.push_str(&((secs / 60) % 60).to_string());
        out.push('m');
    }
    out.push_str(&(secs % 60).to_string());
    push_frac(&mut out, u % NANOS_PER_SEC, 9);
    out.push('s');
    out
}

fn push_frac(out: &mut String, frac: u128, width: usize) {
    if frac == 0 {
        return;
    }
    let digits = format!("{frac:0width$}");
    out.push('.');
    out.push_str(digits.trim_end_matches('0'));
}

/// Parses clock-unit duration notation into a [`TimeDelta`].
pub(crate) fn parse(s: &str) -> Result<TimeDelta> {
    let orig = s;
    let (neg, mut rest) = if let Some(r) = s.strip_prefix('-') {
        (true, r)
    } else {
        (false, s.strip_prefix('+').unwrap_or(s))
    };

    if rest == "0" {
        return Ok(TimeDelta::zero());
    }
    if rest.is_empty() {
        return Err(Error::duration(format!("invalid duration {orig:?}")));
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let (int_part, int_seen, r) = take_digits(rest)?;
        rest = r;

        let (frac_part, frac_len, frac_seen) = if let Some(r) = rest.strip_prefix('.') {
            let (frac, seen, r2) = take_digits(r)?;
            rest = r2;
            (frac, r.len() - r2.len(), seen)
        } else {
            (0, 0, false)
        };

        if !int_seen && !frac_seen {
            return Err(Error::duration(format!("invalid duration {orig:?}")));
        }

        let unit_end = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let unit = &rest[..unit_end];
        rest = &rest[unit_end..];

        if unit.is_empty() {
            return Err(Error::duration(format!("missing unit in duration {orig:?}")));
        }
        let scale = match unit {
            "ns" => 1,
            "us" | "µs" | "μs" => 1_000,
            "ms" => 1_000_000,
            "s" => NANOS_PER_SEC,
            "m" => 60 * NANOS_PER_SEC,
            "h" => 3600 * NANOS_PER_SEC,
            _ => {
                return Err(Error::duration(format!(
                    "unknown unit {unit:?} in duration {orig:?}"
                )))
            }
        };

        total = int_part
            .checked_mul(scale)
            .and_then(|v| total.checked_add(v))
            .filter(|v| *v <= i64::MAX as u128 + 1)
            .ok_or_else(|| Error::duration(format!("invalid duration {orig:?}")))?;
        if frac_len > 0 {
            // Drop excess fraction digits rather than overflowing.
            let (mut frac, mut len) = (frac_part, frac_len as u32);
            while len > 1 && (len > 38 || frac.checked_mul(scale).is_none()) {
                frac /= 10;
                len -= 1;
            }
            total += frac * scale / 10u128.pow(len);
        }
    }

    let limit = i64::MAX as u128 + u128::from(neg);
    if total > limit {
        return Err(Error::duration(format!("invalid duration {orig:?}")));
    }
    let nanos = if neg {
        -(total as i128) as i64
    } else {
        total as i64
    };
    Ok(TimeDelta::nanoseconds(nanos))
}

fn take_digits(s: &str) -> Result<(u128, bool, &str)> {
    let end = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    if end == 0 {
        return Ok((0, false, s));
    }
    let mut v: u128 = 0;
    for b in s[..end].bytes() {
        v = v
            .checked_mul(10)
            .and_then(|v| v.checked_add(u128::from(b - b'0')))
            .ok_or_else(|| Error::duration(format!("invalid duration {s:?}")))?;
    }
    Ok((v, true, &s[end..]))
}
