//! Library of parser functions
//!
//! Both the `Header` and `Cell_H` text files write boxes as bracketed integer
//! tuples, e.g. `((0,0,0) (63,31,15) (0,0,0))`. These share a single parser so
//! that the domain box and every level box are read identically.

// external crates
use nom::bytes::complete::{is_not, tag};
use nom::character::complete::{self, multispace0, space1};
use nom::combinator::all_consuming;
use nom::multi::many0;
use nom::number::complete::double;
use nom::sequence::{preceded, terminated};
use nom::IResult;

/// Inclusive `(low, high)` corners of a box, in natural axis order
pub type Corners = (Vec<i64>, Vec<i64>);

// ! Boolean checks
/// Check for the first line of the box list section
pub fn is_box_section(i: &str) -> bool {
    i.starts_with('(')
}

/// Check for a single `((lo) (hi) (type))` box record
pub fn is_box_record(i: &str) -> bool {
    i.starts_with("((")
}

/// Check for lines starting with the `FabOnDisk:` tag
pub fn is_fab_on_disk(i: &str) -> bool {
    i.starts_with("FabOnDisk:")
}

// ! Parser combinators

/// Blob filename following the `FabOnDisk:` tag
///
/// The trailing byte offset is ignored, every box is located by its own
/// header line instead.
pub fn fab_on_disk(i: &str) -> IResult<&str, &str> {
    preceded(tag("FabOnDisk:"), preceded(space1, is_not(" \t\r\n")))(i)
}

/// A line containing a single integer and nothing else
pub fn whole_integer(i: &str) -> IResult<&str, i64> {
    all_consuming(terminated(complete::i64, multispace0))(i.trim_start())
}

/// A line containing a single floating point value and nothing else
pub fn whole_double(i: &str) -> IResult<&str, f64> {
    all_consuming(terminated(double, multispace0))(i.trim_start())
}

/// Integer at the start of a line, anything after it is left unparsed
pub fn leading_integer(i: &str) -> IResult<&str, i64> {
    complete::i64(i.trim_start())
}

/// Every whitespace separated token on the line as an integer
fn integer_tokens(i: &str) -> IResult<&str, Vec<i64>> {
    all_consuming(terminated(
        many0(preceded(multispace0, complete::i64)),
        multispace0,
    ))(i)
}

/// Replace the tuple punctuation with whitespace
fn strip_brackets(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '(' | ')' | ',' => ' ',
            _ => c,
        })
        .collect()
}

/// Parse a list of bracketed box tuples into `(low, high)` corners
///
/// Brackets and commas are stripped and the remaining tokens parsed as
/// integers positionally. Every box is written as `3 * dim` integers: the low
/// corner, the high corner, and an index type tuple that is discarded. A
/// trailing group with only the two corners is also accepted.
///
/// Returns `None` for any non-integer token, or if not even one box is found.
///
/// ```rust
/// # use pltools_plotfile::parse_int_tuple_list;
/// let boxes = parse_int_tuple_list("((0,0,0) (63,31,15) (0,0,0))", 3).unwrap();
/// assert_eq!(boxes, vec![(vec![0, 0, 0], vec![63, 31, 15])]);
///
/// // one box per refinement level on the header domain line
/// let boxes = parse_int_tuple_list("((0,0) (7,7) (0,0)) ((0,0) (15,15) (0,0))", 2).unwrap();
/// assert_eq!(boxes[1], (vec![0, 0], vec![15, 15]));
/// ```
pub fn parse_int_tuple_list(text: &str, dim: usize) -> Option<Vec<Corners>> {
    if dim == 0 {
        return None;
    }

    let stripped = strip_brackets(text);
    let (_, values) = integer_tokens(&stripped).ok()?;

    let boxes: Vec<Corners> = values
        .chunks(3 * dim)
        .filter(|chunk| chunk.len() >= 2 * dim)
        .map(|chunk| (chunk[..dim].to_vec(), chunk[dim..2 * dim].to_vec()))
        .collect();

    if boxes.is_empty() {
        None
    } else {
        Some(boxes)
    }
}
