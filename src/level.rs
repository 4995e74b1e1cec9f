//! The `"x,y"` wall coordinate format shared with level files. A level is a JSON array of such
//! strings, e.g. `["0,3","4,4"]`.

use crate::error::{Result, RouteError};
use crate::SIDE;

/// Parses a single `"x,y"` coordinate. Anything that is not two in-range integers separated by a
/// comma is reported as [RouteError::OutOfBounds].
pub fn parse_coordinate(coordinate: &str) -> Result<(i32, i32)> {
    let out_of_bounds = || RouteError::OutOfBounds(coordinate.to_owned());
    let (x, y) = coordinate.split_once(',').ok_or_else(out_of_bounds)?;
    let x = x.trim().parse::<i32>().map_err(|_| out_of_bounds())?;
    let y = y.trim().parse::<i32>().map_err(|_| out_of_bounds())?;
    check_bounds(x, y)?;
    Ok((x, y))
}

/// Fails with [RouteError::OutOfBounds] unless `0 <= x, y < SIDE`.
pub fn check_bounds(x: i32, y: i32) -> Result<()> {
    if in_bounds(x, y) {
        Ok(())
    } else {
        Err(RouteError::OutOfBounds(format_coordinate(x, y)))
    }
}

pub fn in_bounds(x: i32, y: i32) -> bool {
    x >= 0 && y >= 0 && (x as usize) < SIDE && (y as usize) < SIDE
}

pub fn format_coordinate(x: i32, y: i32) -> String {
    format!("{x},{y}")
}

/// Reads the wall coordinates of a level file.
pub fn level_from_json(json: &str) -> Result<Vec<String>> {
    Ok(serde_json::from_str(json)?)
}

/// Writes wall coordinates in the level file format.
pub fn level_to_json(walls: &[String]) -> Result<String> {
    Ok(serde_json::to_string(walls)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_coordinates() {
        assert_eq!(parse_coordinate("3,7"), Ok((3, 7)));
        assert_eq!(parse_coordinate(" 10, 0 "), Ok((10, 0)));
    }

    #[test]
    fn rejects_malformed_coordinates() {
        let malformed = ["", "3", "3;4", "a,1", "1,b", "1.5,2"];
        let outside = ["-1,0", "0,11", "11,11"];
        for bad in malformed.into_iter().chain(outside) {
            assert!(
                matches!(parse_coordinate(bad), Err(RouteError::OutOfBounds(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn json_level_format() {
        let walls = level_from_json(r#"["0,1","5,5"]"#).unwrap();
        assert_eq!(walls, vec!["0,1".to_owned(), "5,5".to_owned()]);
        assert_eq!(level_to_json(&walls).unwrap(), r#"["0,1","5,5"]"#);
        assert!(matches!(
            level_from_json("[1,2]"),
            Err(RouteError::Level(_))
        ));
    }
}
