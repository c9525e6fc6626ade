use std::time::Duration;

use anyhow::anyhow;
use nom::IResult;
use nom::character::complete::{char, u32 as p_u32};
use nom::combinator::{all_consuming, opt};
use nom::sequence::{preceded, tuple};

type HmsParts = (u32, Option<u32>, Option<u32>);

fn p_hms_time(input: &str) -> IResult<&str, HmsParts> {
    tuple((
        p_u32,
        opt(preceded(char(':'), p_u32)),
        opt(preceded(char(':'), p_u32)),
    ))(input)
}

/// Parses time strings in the format [[hh:]mm:]ss.
/// Individual time values may be zero padded.
pub fn parse_hms_time(input: &str) -> anyhow::Result<Duration> {
    let (_, parsed) = all_consuming(p_hms_time)(input)
        .map_err(|e| anyhow!("expected [[HH:]MM:]SS value: {e}"))?;
    let seconds = match parsed {
        (seconds, None, None) => u64::from(seconds),
        (minutes, Some(seconds), None) => u64::from(minutes) * 60 + u64::from(seconds),
        (hours, Some(minutes), Some(seconds)) => {
            u64::from(hours) * 3600 + u64::from(minutes) * 60 + u64::from(seconds)
        }
        (_, None, Some(_)) => return Err(anyhow!("Invalid time specification")),
    };
    Ok(Duration::from_secs(seconds))
}

/// Accepts either `[[HH:]MM:]SS` or humantime format (`2h`, `30min`).
pub fn parse_walltime(text: &str) -> anyhow::Result<Duration> {
    let text = text.trim();
    parse_hms_time(text)
        .or_else(|_| humantime::parse_duration(text))
        .map_err(|e| {
            anyhow!("could not parse walltime. Use either `HH:MM:SS` or humantime format (2hours): {e}")
        })
}
