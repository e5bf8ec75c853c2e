//! Session-start notices.
//!
//! Immediately after accepting a connection the server writes a short
//! burst of notice lines terminated by one empty line; only then does
//! the report loop begin. An admitted client receives the welcome
//! notice. A client rejected for capacity receives the rejection and
//! closing notices in one burst, after which the server closes the
//! connection without ever creating a session.

use std::fmt;

/// A notice line sent by the server during session start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// The connection was admitted and the report loop will start
    Welcome,
    /// The server is at its concurrent-connection capacity
    TooManyConnections,
    /// The server is about to close this connection
    Closing,
}

impl Notice {
    /// Returns the exact notice text as written on the wire.
    pub fn text(&self) -> &'static str {
        match self {
            Self::Welcome => "connected to environment control server",
            Self::TooManyConnections => "too many connections",
            Self::Closing => "closing connection",
        }
    }

    /// Matches a received notice line back to its typed form.
    ///
    /// Trims the line first, so it accepts lines straight out of
    /// `read_line`. Returns `None` for unknown text.
    pub fn from_text(line: &str) -> Option<Self> {
        let line = line.trim();
        [Self::Welcome, Self::TooManyConnections, Self::Closing]
            .into_iter()
            .find(|notice| notice.text() == line)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text())
    }
}

/// Encodes a burst of notices: one line per notice, then the empty
/// terminator line.
pub fn encode_burst(notices: &[Notice]) -> String {
    let mut out = String::new();
    for notice in notices {
        out.push_str(notice.text());
        out.push('\n');
    }
    out.push('\n');
    out
}

/// Returns true if a received line is the end-of-burst terminator.
pub fn is_end_of_burst(line: &str) -> bool {
    line.trim().is_empty()
}
