//! Plain-text instance format.
//!
//! The layout is whitespace-separated:
//!
//! ```text
//! n m <ignored> <ignored>
//! <machine-id> p[0][0] <machine-id> p[1][0] ...    (one line per job)
//! SSD
//! M0
//! s[0][0][0] s[0][0][1] ...                        (n x n values)
//! M1
//! ...
//! ```
//!
//! Machine ids and section labels are read but not interpreted.

use super::error::InstanceError;
use super::instance::ProblemInstance;
use std::str::SplitWhitespace;

struct Tokens<'a> {
    inner: SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            inner: text.split_whitespace(),
        }
    }

    fn skip(&mut self, what: &'static str) -> Result<(), InstanceError> {
        self.inner
            .next()
            .map(|_| ())
            .ok_or(InstanceError::UnexpectedEof { what })
    }

    fn number<T: std::str::FromStr>(&mut self, what: &'static str) -> Result<T, InstanceError> {
        let token = self
            .inner
            .next()
            .ok_or(InstanceError::UnexpectedEof { what })?;
        token.parse().map_err(|_| InstanceError::InvalidToken {
            what,
            token: token.to_string(),
        })
    }
}

pub(super) fn parse_instance(text: &str) -> Result<ProblemInstance, InstanceError> {
    let mut tokens = Tokens::new(text);

    let n: usize = tokens.number("job count")?;
    let m: usize = tokens.number("machine count")?;
    tokens.skip("header")?;
    tokens.skip("header")?;

    // Every value is a token of at least one byte, so a header that needs
    // more tokens than the text has bytes can never be satisfied.
    let needed = n
        .checked_mul(m)
        .and_then(|nm| nm.checked_mul(2))
        .and_then(|pairs| {
            let setups = n.checked_mul(n)?.checked_add(1)?.checked_mul(m)?;
            pairs.checked_add(setups)?.checked_add(1)
        });
    if needed.map_or(true, |needed| needed > text.len()) {
        return Err(InstanceError::TooLarge { jobs: n, machines: m });
    }

    let mut p: Vec<Vec<u32>> = (0..m).map(|_| Vec::with_capacity(n)).collect();
    for _ in 0..n {
        for row in p.iter_mut() {
            tokens.skip("machine id")?;
            row.push(tokens.number("processing time")?);
        }
    }

    tokens.skip("setup section label")?;

    let mut s = Vec::with_capacity(m);
    for _ in 0..m {
        tokens.skip("machine label")?;
        let mut matrix = Vec::with_capacity(n);
        for _ in 0..n {
            let row = (0..n)
                .map(|_| tokens.number("setup time"))
                .collect::<Result<Vec<u32>, _>>()?;
            matrix.push(row);
        }
        s.push(matrix);
    }

    ProblemInstance::new(n, m, p, s)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = "\
3 2 0 0
0 5 1 7
0 3 1 2
0 4 1 9
SSD
M0
0 1 2
3 0 4
5 6 0
M1
0 0 1
1 0 0
2 2 0
";

    #[test]
    fn test_parse_small() {
        let problem = ProblemInstance::parse(SMALL).unwrap();
        assert_eq!(problem.n(), 3);
        assert_eq!(problem.m(), 2);
        assert_eq!(problem.processing(0, 0), 5);
        assert_eq!(problem.processing(1, 0), 7);
        assert_eq!(problem.processing(1, 2), 9);
        assert_eq!(problem.setup(0, 1, 2), 4);
        assert_eq!(problem.setup(1, 2, 0), 2);
    }

    #[test]
    fn test_parse_via_from_str() {
        let problem: ProblemInstance = SMALL.parse().unwrap();
        assert_eq!(problem.processing(0, 1), 3);
    }

    #[test]
    fn test_parse_truncated() {
        let truncated = &SMALL[..SMALL.len() - 8];
        let err = ProblemInstance::parse(truncated).unwrap_err();
        assert!(matches!(err, InstanceError::UnexpectedEof { .. }));
    }

    #[test]
    fn test_parse_invalid_token() {
        let err = ProblemInstance::parse("3 x 0 0").unwrap_err();
        match err {
            InstanceError::InvalidToken { what, token } => {
                assert_eq!(what, "machine count");
                assert_eq!(token, "x");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_negative_rejected() {
        let err = ProblemInstance::parse("1 1 0 0\n0 -4\nSSD\nM0\n0\n").unwrap_err();
        assert!(matches!(err, InstanceError::InvalidToken { .. }));
    }

    #[test]
    fn test_parse_oversized_header() {
        let err = ProblemInstance::parse("1000000000000000000 2 0 0").unwrap_err();
        assert!(matches!(
            err,
            InstanceError::TooLarge {
                jobs: 1_000_000_000_000_000_000,
                machines: 2
            }
        ));

        let err = ProblemInstance::parse("2 1000000000000000000 0 0\n0 1 0 1").unwrap_err();
        assert!(matches!(err, InstanceError::TooLarge { .. }));

        let err = ProblemInstance::parse(&format!("{} {} 0 0", usize::MAX, usize::MAX)).unwrap_err();
        assert!(matches!(err, InstanceError::TooLarge { .. }));
    }

    #[test]
    fn test_parse_header_just_fits() {
        // 1 job on 1 machine needs 2 + 1 + 2 value tokens.
        let problem = ProblemInstance::parse("1 1 0 0 0 4 SSD M0 0").unwrap();
        assert_eq!(problem.processing(0, 0), 4);
    }
}
