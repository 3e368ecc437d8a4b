//! Telnet option negotiation (RFC 854 / RFC 855).
//!
//! Network devices open a telnet session with a burst of `IAC DO`/`IAC WILL`
//! requests. We want a plain NVT: the only options accepted are the server
//! echoing and suppressing go-ahead. Everything else is refused, and
//! subnegotiation blocks are skipped.

use std::collections::HashSet;

/// Interpret As Command.
pub const IAC: u8 = 255;
pub const DONT: u8 = 254;
pub const DO: u8 = 253;
pub const WONT: u8 = 252;
pub const WILL: u8 = 251;
/// Subnegotiation begin.
pub const SB: u8 = 250;
/// Subnegotiation end.
pub const SE: u8 = 240;

pub const OPT_ECHO: u8 = 1;
pub const OPT_SUPPRESS_GO_AHEAD: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum State {
    #[default]
    Data,
    Iac,
    Option(u8),
    Sub,
    SubIac,
}

/// Output of one decode pass.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Decoded {
    /// Application data with all telnet commands removed.
    pub data: Vec<u8>,

    /// Negotiation replies to send back to the peer.
    pub replies: Vec<u8>,
}

/// Incremental telnet stream decoder.
///
/// State survives between calls, so a command split across two reads is
/// handled.
#[derive(Debug, Default)]
pub struct Negotiator {
    state: State,
    answered: HashSet<(u8, u8)>,
}

impl Negotiator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Strip telnet commands from `input` and compute the replies they need.
    pub fn decode(&mut self, input: &[u8]) -> Decoded {
        let mut out = Decoded {
            data: Vec::with_capacity(input.len()),
            replies: Vec::new(),
        };

        let mut i = 0;
        while i < input.len() {
            match self.state {
                State::Data => {
                    let rest = &input[i..];
                    match memchr::memchr2(IAC, 0, rest) {
                        None => {
                            out.data.extend_from_slice(rest);
                            i = input.len();
                        }
                        Some(pos) => {
                            out.data.extend_from_slice(&rest[..pos]);
                            // NUL is line padding after CR, never data
                            if rest[pos] == IAC {
                                self.state = State::Iac;
                            }
                            i += pos + 1;
                        }
                    }
                    continue;
                }
                State::Iac => {
                    self.state = match input[i] {
                        IAC => {
                            out.data.push(IAC);
                            State::Data
                        }
                        cmd @ (DO | DONT | WILL | WONT) => State::Option(cmd),
                        SB => State::Sub,
                        _ => State::Data,
                    };
                }
                State::Option(cmd) => {
                    self.answer(cmd, input[i], &mut out.replies);
                    self.state = State::Data;
                }
                State::Sub => {
                    if input[i] == IAC {
                        self.state = State::SubIac;
                    }
                }
                State::SubIac => {
                    self.state = if input[i] == SE {
                        State::Data
                    } else {
                        State::Sub
                    };
                }
            }
            i += 1;
        }

        out
    }

    fn answer(&mut self, cmd: u8, option: u8, replies: &mut Vec<u8>) {
        let reply = match cmd {
            DO => WONT,
            WILL if option == OPT_ECHO || option == OPT_SUPPRESS_GO_AHEAD => DO,
            WILL => DONT,
            // Acknowledging a refusal would start a loop
            _ => return,
        };

        if self.answered.insert((cmd, option)) {
            replies.extend_from_slice(&[IAC, reply, option]);
        }
    }
}

/// Double every IAC byte in outgoing data.
pub fn escape_iac(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    for &b in data {
        out.push(b);
        if b == IAC {
            out.push(IAC);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_data_passes_through() {
        let mut n = Negotiator::new();
        let decoded = n.decode(b"Username: ");
        assert_eq!(decoded.data, b"Username: ");
        assert!(decoded.replies.is_empty());
    }

    #[test]
    fn test_refuses_do_and_accepts_echo() {
        let mut n = Negotiator::new();
        let decoded = n.decode(&[
            IAC, DO, 24, // terminal type
            IAC, WILL, OPT_ECHO,
            IAC, WILL, OPT_SUPPRESS_GO_AHEAD,
            IAC, WILL, 31, // NAWS
            b'\r', b'\n',
        ]);
        assert_eq!(decoded.data, b"\r\n");
        assert_eq!(
            decoded.replies,
            [
                IAC, WONT, 24,
                IAC, DO, OPT_ECHO,
                IAC, DO, OPT_SUPPRESS_GO_AHEAD,
                IAC, DONT, 31,
            ]
        );
    }

    #[test]
    fn test_command_split_across_reads() {
        let mut n = Negotiator::new();
        let first = n.decode(&[b'a', IAC]);
        let second = n.decode(&[DO]);
        let third = n.decode(&[OPT_ECHO, b'b']);

        assert_eq!(first.data, b"a");
        assert!(second.data.is_empty());
        assert_eq!(third.data, b"b");
        assert_eq!(third.replies, [IAC, WONT, OPT_ECHO]);
    }

    #[test]
    fn test_repeated_request_answered_once() {
        let mut n = Negotiator::new();
        assert_eq!(n.decode(&[IAC, DO, 24]).replies, [IAC, WONT, 24]);
        assert!(n.decode(&[IAC, DO, 24]).replies.is_empty());
    }

    #[test]
    fn test_refusals_not_acknowledged() {
        let mut n = Negotiator::new();
        let decoded = n.decode(&[IAC, WONT, OPT_ECHO, IAC, DONT, 24]);
        assert!(decoded.replies.is_empty());
        assert!(decoded.data.is_empty());
    }

    #[test]
    fn test_subnegotiation_skipped() {
        let mut n = Negotiator::new();
        let decoded = n.decode(&[b'x', IAC, SB, 24, 1, IAC, IAC, IAC, SE, b'y']);
        assert_eq!(decoded.data, b"xy");
    }

    #[test]
    fn test_escaped_iac_and_nul_padding() {
        let mut n = Negotiator::new();
        let decoded = n.decode(&[b'a', IAC, IAC, b'\r', 0, b'b']);
        assert_eq!(decoded.data, [b'a', IAC, b'\r', b'b']);
    }

    #[test]
    fn test_escape_iac() {
        assert_eq!(escape_iac(&[b'a', IAC, b'b']), [b'a', IAC, IAC, b'b']);
    }
}
