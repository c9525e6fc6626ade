//! Host list expressions such as `hype[201-354]` or `n[01-04,08],login1`.

use anyhow::{anyhow, bail};
use nom::IResult;
use nom::branch::alt;
use nom::bytes::complete::is_not;
use nom::character::complete::{char, digit1};
use nom::combinator::{all_consuming, map, map_res, opt};
use nom::multi::{many1, separated_list1};
use nom::sequence::{delimited, preceded, tuple};

/// Upper bound on the number of entries a single expression may expand to.
pub const MAX_HOSTLIST_SIZE: u64 = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NumberRange {
    start: u64,
    end: u64,
    /// Digits of the written lower bound; shorter numbers are zero padded to it.
    width: usize,
}

impl NumberRange {
    fn len(&self) -> u64 {
        (self.end - self.start).saturating_add(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Text(String),
    Ranges(Vec<NumberRange>),
}

fn p_range(input: &str) -> IResult<&str, NumberRange> {
    map_res(
        tuple((digit1, opt(preceded(char('-'), digit1)))),
        |(start, end): (&str, Option<&str>)| -> anyhow::Result<NumberRange> {
            let first = start.parse::<u64>()?;
            let last = end.map(|e| e.parse::<u64>()).transpose()?.unwrap_or(first);
            if last < first {
                bail!("range {first}-{last} is decreasing");
            }
            Ok(NumberRange {
                start: first,
                end: last,
                width: start.len(),
            })
        },
    )(input)
}

fn p_part(input: &str) -> IResult<&str, Part> {
    let ranges = delimited(char('['), separated_list1(char(','), p_range), char(']'));
    let text = is_not("[],");
    alt((
        map(ranges, Part::Ranges),
        map(text, |t: &str| Part::Text(t.to_string())),
    ))(input)
}

fn p_hostlist(input: &str) -> IResult<&str, Vec<Vec<Part>>> {
    separated_list1(char(','), many1(p_part))(input)
}

/// Expands a host list into its entries in written order.
///
/// Bracketed groups hold comma separated numbers or `start-end` ranges; several
/// groups in one entry multiply. Top-level commas separate entries.
pub fn expand_hostlist(input: &str) -> anyhow::Result<Vec<String>> {
    let (_, entries) = all_consuming(p_hostlist)(input.trim())
        .map_err(|e| anyhow!("invalid host list `{input}`: {e}"))?;

    let mut expanded = Vec::new();
    for parts in entries {
        let mut names = vec![String::new()];
        for part in parts {
            match part {
                Part::Text(text) => names.iter_mut().for_each(|name| name.push_str(&text)),
                Part::Ranges(ranges) => {
                    let size = ranges
                        .iter()
                        .fold(0u64, |acc, r| acc.saturating_add(r.len()))
                        .saturating_mul(names.len() as u64)
                        .saturating_add(expanded.len() as u64);
                    if size > MAX_HOSTLIST_SIZE {
                        bail!("host list `{input}` expands to more than {MAX_HOSTLIST_SIZE} entries");
                    }
                    names = names
                        .iter()
                        .flat_map(|prefix| {
                            ranges.iter().flat_map(move |range| {
                                (range.start..=range.end).map(move |value| {
                                    format!("{prefix}{value:0width$}", width = range.width)
                                })
                            })
                        })
                        .collect();
                }
            }
        }
        expanded.extend(names);
    }
    Ok(expanded)
}

#[cfg(test)]
mod tests {
    use super::expand_hostlist;

    #[test]
    fn expand_plain_names() {
        assert_eq!(expand_hostlist("login1").unwrap(), vec!["login1"]);
        assert_eq!(expand_hostlist(" a,b,c ").unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn expand_range() {
        let hosts = expand_hostlist("hype[201-354]").unwrap();
        assert_eq!(hosts.len(), 154);
        assert_eq!(hosts[0], "hype201");
        assert_eq!(hosts[153], "hype354");
    }

    #[test]
    fn expand_keeps_padding() {
        assert_eq!(
            expand_hostlist("n[01-03,10]").unwrap(),
            vec!["n01", "n02", "n03", "n10"]
        );
        assert_eq!(expand_hostlist("n[8-11]").unwrap(), vec!["n8", "n9", "n10", "n11"]);
    }

    #[test]
    fn expand_several_groups() {
        assert_eq!(
            expand_hostlist("r[1-2]n[1-2]-ib,login").unwrap(),
            vec!["r1n1-ib", "r1n2-ib", "r2n1-ib", "r2n2-ib", "login"]
        );
        assert_eq!(expand_hostlist("[3-5]").unwrap(), vec!["3", "4", "5"]);
    }

    #[test]
    fn expand_errors() {
        assert!(expand_hostlist("").is_err());
        assert!(expand_hostlist("n[").is_err());
        assert!(expand_hostlist("n[5-2]").is_err());
        assert!(expand_hostlist("n[a-b]").is_err());
        assert!(expand_hostlist("n[1-2]]").is_err());
        assert!(expand_hostlist("a,,b").is_err());
        assert!(expand_hostlist("n[0-18446744073709551615]").is_err());
        assert!(expand_hostlist("n[1-1000]m[1-1000]").is_err());
    }
}
