// All nom parsers for the formatted ASCII variant, kept in one place

use nom::branch::alt;
use nom::bytes::complete::{is_not, take};
use nom::character::complete::{char, multispace0};
use nom::combinator::value;
use nom::sequence::{delimited, preceded};
use nom::IResult;

/// More convenient error creation for nom
fn cause(s: &str) -> nom::Err<nom::error::Error<&str>> {
    nom::Err::Error(nom::error::Error::new(s, nom::error::ErrorKind::Fail))
}

/// Whitespace-tolerant signed 32-bit integer
pub(crate) fn inte(i: &str) -> IResult<&str, i32> {
    preceded(multispace0, nom::character::complete::i32)(i)
}

/// Whitespace-separated number token, Fortran `D` exponents included
fn number_token(i: &str) -> IResult<&str, &str> {
    preceded(multispace0, is_not(" \t\r\n"))(i)
}

/// Whitespace-tolerant 32-bit float, e.g. `0.1000000E+01`
pub(crate) fn real(i: &str) -> IResult<&str, f32> {
    let (rest, token) = number_token(i)?;
    match token.replace(['D', 'd'], "E").parse::<f32>() {
        Ok(v) => Ok((rest, v)),
        Err(_) => Err(cause(i)),
    }
}

/// Whitespace-tolerant 64-bit float, e.g. `0.1000000000000D+001`
pub(crate) fn doub(i: &str) -> IResult<&str, f64> {
    let (rest, token) = number_token(i)?;
    match token.replace(['D', 'd'], "E").parse::<f64>() {
        Ok(v) => Ok((rest, v)),
        Err(_) => Err(cause(i)),
    }
}

/// Whitespace-tolerant logical, `T` or `F`
pub(crate) fn logi(i: &str) -> IResult<&str, bool> {
    preceded(
        multispace0,
        alt((value(true, char('T')), value(false, char('F')))),
    )(i)
}

/// Quoted fixed-width string, trailing padding stripped
pub(crate) fn quoted(width: usize) -> impl Fn(&str) -> IResult<&str, String> {
    move |i: &str| {
        let (rest, s) = preceded(
            multispace0,
            delimited(char('\''), take(width), char('\'')),
        )(i)?;
        Ok((rest, s.trim_end().to_string()))
    }
}
