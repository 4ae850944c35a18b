//! Canonical key strings for summary vectors
//!
//! The user-facing key of a vector depends on the first character of its
//! keyword:
//!
//! | First char | Key shape                                          |
//! | ---------- | -------------------------------------------------- |
//! | `A`        | `KEYWORD:num`                                      |
//! | `B`        | `KEYWORD:i,j,k`                                    |
//! | `C`        | `KEYWORD:WGNAME:i,j,k`                             |
//! | `G`        | `KEYWORD:WGNAME`                                   |
//! | `L?`       | local-grid qualified variants of `B`, `C` and `W`  |
//! | `R`        | `KEYWORD:num`, or `KEYWORD:r1-r2` for inter-region |
//! | `S`        | `KEYWORD:WGNAME:num`                               |
//! | `W`        | `KEYWORD:WGNAME` (`...:num` for completions)       |
//! | other      | `KEYWORD`                                          |
//!
//! An empty key marks a column that exists in PARAMS but is not
//! user-addressable.

// crate modules
use crate::error::{Error, Result};
use crate::node::{is_well_completion, miscellaneous_exception, LgrInfo};

/// The WGNAMES sentinel for "no well or group"
pub const NO_WGNAME: &str = ":+:+:+:+";

/// Unpack a 1-based global cell number into 1-based (i, j, k)
pub fn ijk_from_cell_number(number: i32, ni: usize, nj: usize) -> (i32, i32, i32) {
    let mut rest = number - 1;

    let i = 1 + rest % ni as i32;
    rest /= ni as i32;
    let j = 1 + rest % nj as i32;
    let k = 1 + rest / nj as i32;

    (i, j, k)
}

/// Split a packed inter-region number, `num = r1 + 32768*(r2 + 10)`
pub fn split_region_pair(number: i32) -> (i32, i32) {
    (number % (1 << 15), number / (1 << 15) - 10)
}

/// Inter-region flow/flux keywords carry `FR` or `FT` at position 3 or 4
fn is_region_to_region(keyword: &str) -> bool {
    let bytes = keyword.as_bytes();
    let window =
        |start: usize| bytes.len() >= start + 2 && matches!(&bytes[start..start + 2], b"FR" | b"FT");

    window(2) || window(3)
}

/// Build the canonical key for one spec-file column
///
/// `keyword` must already be normalised (see
/// [normalise_keyword](crate::node::normalise_keyword)); `ni`/`nj` are the
/// grid dimensions used to unpack cell numbers. An `Ok(String::new())`
/// result means the column is valid but not addressable.
pub fn make_key_string(
    keyword: &str,
    wgname: &str,
    number: i32,
    lgr: Option<&LgrInfo>,
    ni: usize,
    nj: usize,
) -> Result<String> {
    let Some(first) = keyword.chars().next() else {
        return Ok(String::new());
    };

    let key = match first {
        'A' => {
            if number <= 0 {
                String::new()
            } else {
                format!("{keyword}:{number}")
            }
        }

        'B' => {
            if number <= 0 {
                String::new()
            } else {
                let (i, j, k) = ijk_from_cell_number(number, ni, nj);
                format!("{keyword}:{i},{j},{k}")
            }
        }

        'C' => {
            if number <= 0 {
                String::new()
            } else {
                let (i, j, k) = ijk_from_cell_number(number, ni, nj);
                format!("{keyword}:{wgname}:{i},{j},{k}")
            }
        }

        'G' => {
            if wgname == NO_WGNAME {
                String::new()
            } else {
                format!("{keyword}:{wgname}")
            }
        }

        'L' => {
            let lgr = lgr.ok_or(Error::MissingLgrInfo)?;

            match keyword.chars().nth(1) {
                Some('B') => format!(
                    "{keyword}:{}:{},{},{}",
                    lgr.name, lgr.ijk[0], lgr.ijk[1], lgr.ijk[2]
                ),
                Some('C') => format!(
                    "{keyword}:{}:{wgname}:{},{},{}",
                    lgr.name, lgr.ijk[0], lgr.ijk[1], lgr.ijk[2]
                ),
                Some('W') => format!("{keyword}:{}:{wgname}", lgr.name),
                _ => keyword.to_string(),
            }
        }

        'R' => {
            if number <= 0 {
                String::new()
            } else if keyword == "RORFR" {
                // standard region keyword despite the FR letters
                format!("{keyword}:{number}")
            } else if is_region_to_region(keyword) {
                let (r1, r2) = split_region_pair(number);
                format!("{keyword}:{r1}-{r2}")
            } else {
                format!("{keyword}:{number}")
            }
        }

        'S' => {
            if miscellaneous_exception(keyword) {
                keyword.to_string()
            } else if wgname == NO_WGNAME || number <= 0 {
                String::new()
            } else {
                format!("{keyword}:{wgname}:{number}")
            }
        }

        'W' => {
            if wgname == NO_WGNAME {
                String::new()
            } else if is_well_completion(keyword) {
                format!("{keyword}:{wgname}:{number}")
            } else {
                format!("{keyword}:{wgname}")
            }
        }

        _ => keyword.to_string(),
    };

    Ok(key)
}
