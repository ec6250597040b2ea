//! `Range` request header handling for video playback.
//!
//! Only a single `bytes` range is honoured. Multi-range requests, other units and syntax
//! errors fall back to the full body, as RFC 9110 allows a server to ignore the header.

/// What to send for a request against a blob of known length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOutcome {
    /// 200 with the whole blob.
    Full,
    /// 206 with bytes `start..=end`.
    Partial { start: u64, end: u64 },
    /// 416; the range does not overlap the blob.
    Unsatisfiable,
}

pub fn resolve_range(header: Option<&str>, len: u64) -> RangeOutcome {
    let Some(header) = header else {
        return RangeOutcome::Full;
    };

    let header = header.trim();
    let Some((unit, spec)) = header.split_once('=') else {
        return RangeOutcome::Full;
    };
    if !unit.trim().eq_ignore_ascii_case("bytes") || spec.contains(',') {
        return RangeOutcome::Full;
    }

    let Some((first, last)) = spec.trim().split_once('-') else {
        return RangeOutcome::Full;
    };
    let (first, last) = (first.trim(), last.trim());

    match (first.is_empty(), last.is_empty()) {
        // bytes=-n: the final n bytes
        (true, false) => match last.parse::<u64>() {
            Ok(0) => RangeOutcome::Unsatisfiable,
            Ok(_) if len == 0 => RangeOutcome::Unsatisfiable,
            Ok(suffix) => RangeOutcome::Partial {
                start: len.saturating_sub(suffix),
                end: len - 1,
            },
            Err(_) => RangeOutcome::Full,
        },
        // bytes=a-
        (false, true) => match first.parse::<u64>() {
            Ok(start) if start >= len => RangeOutcome::Unsatisfiable,
            Ok(start) => RangeOutcome::Partial {
                start,
                end: len - 1,
            },
            Err(_) => RangeOutcome::Full,
        },
        // bytes=a-b
        (false, false) => match (first.parse::<u64>(), last.parse::<u64>()) {
            (Ok(start), Ok(end)) if end < start => RangeOutcome::Full,
            (Ok(start), Ok(_)) if start >= len => RangeOutcome::Unsatisfiable,
            (Ok(start), Ok(end)) => RangeOutcome::Partial {
                start,
                end: end.min(len - 1),
            },
            _ => RangeOutcome::Full,
        },
        (true, true) => RangeOutcome::Full,
    }
}
