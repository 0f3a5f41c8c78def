use crate::caption::Caption;

use nom::bytes::complete::tag;
use nom::character::complete::{digit1, space0, space1};
use nom::combinator::{all_consuming, map_res};
use nom::IResult;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseReport {
    pub captions: Vec<Caption>,
    pub dropped: Vec<DroppedBlock>,
}

impl ParseReport {
    pub fn block_count(&self) -> usize {
        self.captions.len() + self.dropped.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DroppedBlock {
    pub block: usize,
    pub reason: DropReason,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DropReason {
    TooShort,
    BadTiming,
}

// Lenient block-by-block parse: a malformed block is dropped and reported,
// never fatal. A fully corrupted file yields zero captions, which callers
// treat as a valid "nothing loaded" state.
pub fn parse(content: &str) -> ParseReport {
    let content = content.strip_prefix('\u{FEFF}').unwrap_or(content);
    let content = content.replace("\r\n", "\n");

    let mut report = ParseReport::default();
    let blocks = content
        .trim()
        .split("\n\n")
        .filter(|block| !block.trim().is_empty());
    for (index, block) in blocks.enumerate() {
        match parse_block(block) {
            Ok(caption) => report.captions.push(caption),
            Err(reason) => {
                let dropped = DroppedBlock {
                    block: index,
                    reason,
                };
                log::debug!("dropping block {}: {:?}", dropped.block, dropped.reason);
                report.dropped.push(dropped);
            }
        }
    }
    report
}

fn parse_block(block: &str) -> Result<Caption, DropReason> {
    let lines: Vec<&str> = block.lines().collect();
    if lines.len() < 3 {
        return Err(DropReason::TooShort);
    }

    let (_, (start, end)) =
        all_consuming(timing_line)(lines[1]).map_err(|_| DropReason::BadTiming)?;

    Ok(Caption {
        id: lines[0].to_string(),
        start,
        end,
        text: lines[2..].join(" "),
    })
}

fn timing_line(input: &str) -> IResult<&str, (f64, f64)> {
    let (input, start) = timestamp(input)?;
    let (input, _) = space1(input)?;
    let (input, _) = tag("-->")(input)?;
    let (input, _) = space1(input)?;
    let (input, end) = timestamp(input)?;
    let (input, _) = space0(input)?;

    Ok((input, (start, end)))
}

fn timestamp(input: &str) -> IResult<&str, f64> {
    let (input, hours) = number(input)?;
    let (input, _) = tag(":")(input)?;
    let (input, minutes) = number(input)?;
    let (input, _) = tag(":")(input)?;
    let (input, seconds) = number(input)?;
    let (input, _) = tag(",")(input)?;
    let (input, millis) = number(input)?;

    let seconds = (hours * 3600 + minutes * 60 + seconds) as f64 + millis as f64 / 1000.0;
    Ok((input, seconds))
}

fn number(input: &str) -> IResult<&str, u64> {
    map_res(digit1, |s: &str| s.parse())(input)
}
