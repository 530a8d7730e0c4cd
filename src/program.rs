use std::io;

use crate::error::{Error, Result};

/// the initial contents of memory
pub type Program = Vec<i64>;

/// parse a comma-separated program, e.g. `1,9,10,3,2,3,11,0,99,30,40,50`
pub fn parse(text: &str) -> Result<Program> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }
    text.split(',')
        .enumerate()
        .map(|(index, token)| {
            let token = token.trim();
            token.parse::<i64>().map_err(|source| Error::Parse {
                index,
                token: token.to_string(),
                source,
            })
        })
        .collect()
}

/// read a whole program from `reader`
pub fn read(reader: &mut impl io::Read) -> Result<Program> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ok() -> Result<()> {
        assert_eq!(parse("1,0,0,0,99")?, vec![1, 0, 0, 0, 99]);
        assert_eq!(parse(" 3, -1 ,8\n")?, vec![3, -1, 8]);
        assert_eq!(parse("104,1125899906842624,99")?[1], 1125899906842624);
        Ok(())
    }

    #[test]
    fn test_parse_empty() -> Result<()> {
        assert!(parse("\n")?.is_empty());
        Ok(())
    }

    #[test]
    fn test_parse_reports_bad_token() {
        match parse("1,2,x3,99") {
            Err(Error::Parse { index, token, .. }) => {
                assert_eq!(index, 2);
                assert_eq!(token, "x3");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(parse("1,,99"), Err(Error::Parse { index: 1, .. })));
    }

    #[test]
    fn test_read_from_reader() -> Result<()> {
        let mut src: &[u8] = b"2,3,0,3,99\n";
        assert_eq!(read(&mut src)?, vec![2, 3, 0, 3, 99]);
        Ok(())
    }
}
