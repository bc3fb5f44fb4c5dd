//! Sequence text parser
//!
//! Grammar (no whitespace allowed):
//!
//! ```text
//! sequence = [ step { "," step } [ "," ] ]
//! step     = [ "-" ] pin
//! pin      = digit { digit } | "rts" | "dtr" | "brk"
//! ```
//!
//! A leading `-` deasserts the pin, otherwise it is asserted.

use super::{Level, LogicalPin, PinRef, Sequence, Step};
use crate::error::{ParseError, ParseErrorKind};

/// Parse sequence text into a [`Sequence`]
///
/// Empty input yields an empty sequence. The `entry:exit` split is done by
/// the caller; a `:` here is rejected like any other stray character.
pub fn parse(text: &str) -> Result<Sequence, ParseError> {
    let mut cursor = Cursor::new(text);
    let mut steps = Vec::new();

    while !cursor.is_eof() {
        steps.push(parse_step(&mut cursor)?);

        match cursor.peek() {
            None => break,
            Some(',') => cursor.advance(1),
            Some(c) => {
                return Err(ParseError::new(
                    ParseErrorKind::NotASeparator(c),
                    cursor.position(),
                ))
            }
        }
    }

    Ok(Sequence::new(steps))
}

fn parse_step(cursor: &mut Cursor<'_>) -> Result<Step, ParseError> {
    let level = if cursor.eat("-") {
        Level::Deasserted
    } else {
        Level::Asserted
    };
    let pin = parse_pin(cursor)?;
    Ok(Step::new(pin, level))
}

fn parse_pin(cursor: &mut Cursor<'_>) -> Result<PinRef, ParseError> {
    let start = cursor.position();

    match cursor.peek() {
        None => Err(ParseError::new(ParseErrorKind::UnexpectedEnd, start)),
        Some(c) if c.is_ascii_digit() => {
            let digits = cursor.take_while(|c| c.is_ascii_digit());
            digits
                .parse()
                .map(PinRef::Gpio)
                .map_err(|_| ParseError::new(ParseErrorKind::PinOutOfRange, start))
        }
        Some(c) => LogicalPin::ALL
            .into_iter()
            .find(|pin| cursor.eat(pin.keyword()))
            .map(PinRef::Logical)
            .ok_or(ParseError::new(ParseErrorKind::NotAPin(c), start)),
    }
}

/// Position-tracking view over the input text
struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn position(&self) -> usize {
        self.pos
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn advance(&mut self, len: usize) {
        self.pos += len;
    }

    /// Consume `prefix` if the remaining input starts with it
    fn eat(&mut self, prefix: &str) -> bool {
        if self.rest().starts_with(prefix) {
            self.advance(prefix.len());
            true
        } else {
            false
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let len = rest.find(|c| !pred(c)).unwrap_or(rest.len());
        self.advance(len);
        &rest[..len]
    }
}
