//! Whitespace-separated tokens with `#` line comments, shared by the
//! level and behavior-script parsers.

/// Iterator over the tokens of a text. A `#` at the start of a token
/// comments out the rest of its line.
pub struct Tokens<'a> {
    rest: &'a str,
}

impl<'a> Tokens<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { rest: text }
    }

    fn skip_blank(&mut self) {
        loop {
            self.rest = self.rest.trim_start();
            if let Some(comment) = self.rest.strip_prefix('#') {
                self.rest = comment.find('\n').map_or("", |nl| &comment[nl..]);
            } else {
                return;
            }
        }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        self.skip_blank();
        if self.rest.is_empty() {
            return None;
        }
        let end = self.rest.find(char::is_whitespace).unwrap_or(self.rest.len());
        let (token, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(token)
    }
}

/// Lenient integer parsing: an optional sign followed by leading digits,
/// anything else reads as zero. "12abc" is 12, "abc" is 0.
pub fn lenient_int(token: Option<&str>) -> i64 {
    let Some(token) = token else { return 0 };
    let (sign, digits) = match token.as_bytes().first() {
        Some(b'-') => (-1, &token[1..]),
        Some(b'+') => (1, &token[1..]),
        _ => (1, token),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end]
        .parse::<i64>()
        .map(|n| sign * n)
        .unwrap_or(0)
}

/// Lenient parse clamped into `u32`; negatives become zero.
pub fn lenient_u32(token: Option<&str>) -> u32 {
    lenient_int(token).clamp(0, u32::MAX as i64) as u32
}
