//! The protocol loop: announce readiness, then dispatch commands until the
//! host closes the stream.

use std::io::{BufRead, Write};

use tracing::{debug, info, instrument, trace};

use crate::core::command::Command;
use crate::core::moves::MoveSource;
use crate::core::parse::{ParsePolicy, parse_int};
use crate::core::session::Session;
use crate::error::AgentError;
use crate::io::reply::ReplyWriter;
use crate::io::tokens::TokenReader;

/// What a single dispatch did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// `start` replaced the session.
    Started(Session),
    /// `yourmove` was answered with this value.
    Moved(u64),
    /// `move` broadcast consumed this many argument tokens.
    Observed(usize),
    /// Token matched no command.
    Ignored,
    /// Inbound stream is exhausted.
    Closed,
}

/// Counters for one run of the loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub commands: u64,
    pub sessions: u64,
    pub moves_sent: u64,
    pub rounds_observed: u64,
    pub ignored: u64,
}

impl RunSummary {
    fn record(&mut self, dispatch: Dispatch) {
        match dispatch {
            Dispatch::Started(_) => self.sessions += 1,
            Dispatch::Moved(_) => self.moves_sent += 1,
            Dispatch::Observed(_) => self.rounds_observed += 1,
            Dispatch::Ignored => self.ignored += 1,
            Dispatch::Closed => return,
        }
        self.commands += 1;
    }
}

/// Protocol participant owning its streams, session and move source.
pub struct ProtocolAgent<R, W, M> {
    tokens: TokenReader<R>,
    out: ReplyWriter<W>,
    moves: M,
    policy: ParsePolicy,
    session: Session,
}

impl<R: BufRead, W: Write, M: MoveSource> ProtocolAgent<R, W, M> {
    pub fn new(input: R, output: W, moves: M, policy: ParsePolicy) -> Self {
        Self {
            tokens: TokenReader::new(input),
            out: ReplyWriter::new(output),
            moves,
            policy,
            session: Session::default(),
        }
    }

    pub fn session(&self) -> Session {
        self.session
    }

    pub fn into_output(self) -> W {
        self.out.into_inner()
    }

    /// Write `ready`, then dispatch until the input ends.
    ///
    /// Returns normally on end of input. Transport failures and, under
    /// [`ParsePolicy::Strict`], protocol violations end the loop with an error.
    #[instrument(skip_all, fields(policy = ?self.policy))]
    pub fn run(&mut self) -> Result<RunSummary, AgentError> {
        self.out.ready()?;
        debug!("announced ready");

        let mut summary = RunSummary::default();
        loop {
            let dispatch = self.step()?;
            if dispatch == Dispatch::Closed {
                break;
            }
            summary.record(dispatch);
        }
        info!(
            commands = summary.commands,
            sessions = summary.sessions,
            moves_sent = summary.moves_sent,
            rounds_observed = summary.rounds_observed,
            ignored = summary.ignored,
            "input closed"
        );
        Ok(summary)
    }

    /// Read one command token and carry it out.
    pub fn step(&mut self) -> Result<Dispatch, AgentError> {
        let Some(token) = self.tokens.next_token()? else {
            return Ok(Dispatch::Closed);
        };
        match Command::from_token(&token) {
            Command::Start => self.start(),
            Command::YourMove => self.your_move(),
            Command::Move => self.observe_round(),
            Command::Unknown => {
                trace!(token = %token, "ignoring unknown token");
                Ok(Dispatch::Ignored)
            }
        }
    }

    fn start(&mut self) -> Result<Dispatch, AgentError> {
        let player_count = self.int_arg(Command::Start, "player_count")?;
        let _self_index = self.int_arg(Command::Start, "self_index")?;
        let option_count = self.int_arg(Command::Start, "option_count")?;
        self.session = Session::new(player_count, option_count);
        debug!(player_count, option_count, "session started");
        Ok(Dispatch::Started(self.session))
    }

    fn your_move(&mut self) -> Result<Dispatch, AgentError> {
        let options = self.session.legal_options(self.policy)?;
        let mv = self.moves.choose(options);
        self.out.line(mv)?;
        debug!(mv, options = options.get(), "move sent");
        Ok(Dispatch::Moved(mv))
    }

    /// Consume the round broadcast. Lenient play drops the values unread;
    /// strict play checks that each one is an integer.
    fn observe_round(&mut self) -> Result<Dispatch, AgentError> {
        let arity = self.session.move_arity(self.policy)?;
        let consumed = match self.policy {
            ParsePolicy::Lenient => self.tokens.skip(arity)?,
            ParsePolicy::Strict => {
                for read in 0..arity {
                    let Some(token) = self.tokens.next_token()? else {
                        return Err(AgentError::violation(
                            Command::Move,
                            format!("expected {arity} values, input ended after {read}"),
                        ));
                    };
                    parse_int(Some(&token), Command::Move, "value", self.policy)?;
                }
                arity
            }
        };
        debug!(consumed, "round observed");
        Ok(Dispatch::Observed(consumed))
    }

    fn int_arg(&mut self, command: Command, field: &'static str) -> Result<i64, AgentError> {
        let token = self.tokens.next_token()?;
        parse_int(token.as_deref(), command, field, self.policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::moves::UniformMoves;
    use rand::rngs::StdRng;
    use std::cell::RefCell;
    use std::io::{self, BufReader, Read};
    use std::rc::Rc;

    type TestAgent<'a> = ProtocolAgent<&'a [u8], Vec<u8>, UniformMoves<StdRng>>;

    fn agent(input: &str, policy: ParsePolicy) -> TestAgent<'_> {
        ProtocolAgent::new(input.as_bytes(), Vec::new(), UniformMoves::seeded(11), policy)
    }

    fn output_lines(agent: TestAgent<'_>) -> Vec<String> {
        String::from_utf8(agent.into_output())
            .expect("utf8")
            .lines()
            .map(str::to_owned)
            .collect()
    }

    /// Shared record of reads, writes and flushes across both streams.
    #[derive(Clone, Default)]
    struct EventLog(Rc<RefCell<Vec<&'static str>>>);

    struct LoggedInput {
        log: EventLog,
        data: &'static [u8],
    }

    impl Read for LoggedInput {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.log.0.borrow_mut().push("read");
            self.data.read(buf)
        }
    }

    struct LoggedOutput {
        log: EventLog,
        bytes: Vec<u8>,
    }

    impl Write for LoggedOutput {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            self.log.0.borrow_mut().push("write");
            self.bytes.extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            self.log.0.borrow_mut().push("flush");
            Ok(())
        }
    }

    #[test]
    fn ready_is_flushed_before_any_input_is_read() {
        let log = EventLog::default();
        let input = BufReader::new(LoggedInput {
            log: log.clone(),
            data: b"start 2 0 3\nyourmove\n",
        });
        let output = LoggedOutput {
            log: log.clone(),
            bytes: Vec::new(),
        };
        let mut agent =
            ProtocolAgent::new(input, output, UniformMoves::seeded(1), ParsePolicy::Strict);
        agent.run().unwrap();

        let events = log.0.borrow().clone();
        let first_read = events.iter().position(|e| *e == "read").expect("read");
        let first_flush = events.iter().position(|e| *e == "flush").expect("flush");
        assert!(first_flush < first_read, "{events:?}");
        assert!(events[..first_flush].iter().all(|e| *e == "write"));

        let out = String::from_utf8(agent.into_output().bytes).unwrap();
        assert!(out.starts_with("ready\n"), "{out}");
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "host went away"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct FailingInput;

    impl Read for FailingInput {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "stdin reset"))
        }
    }

    #[test]
    fn broken_output_ends_the_run_as_transport_failure() {
        let mut agent = ProtocolAgent::new(
            "start 2 0 3\nyourmove\n".as_bytes(),
            BrokenPipe,
            UniformMoves::seeded(1),
            ParsePolicy::Lenient,
        );
        let err = agent.run().expect_err("write fails");
        assert!(!err.is_protocol_violation());
        assert!(
            matches!(&err, AgentError::Io(io_err) if io_err.kind() == io::ErrorKind::BrokenPipe),
            "{err}"
        );
    }

    #[test]
    fn failing_input_ends_the_run_as_transport_failure() {
        let mut agent = ProtocolAgent::new(
            BufReader::new(FailingInput),
            Vec::new(),
            UniformMoves::seeded(1),
            ParsePolicy::Strict,
        );
        let err = agent.run().expect_err("read fails");
        assert!(!err.is_protocol_violation());
        assert!(err.to_string().contains("stdin reset"));
        assert_eq!(agent.into_output(), b"ready\n");
    }

    #[test]
    fn step_reports_each_dispatch() {
        let mut agent = agent("start 3 0 5 move 4 1 2 3 bogus", ParsePolicy::Strict);
        assert_eq!(agent.step().unwrap(), Dispatch::Started(Session::new(3, 5)));
        assert_eq!(agent.step().unwrap(), Dispatch::Observed(4));
        assert_eq!(agent.step().unwrap(), Dispatch::Ignored);
        assert_eq!(agent.step().unwrap(), Dispatch::Closed);
    }

    #[test]
    fn move_leaves_the_next_token_for_the_next_command() {
        let mut agent = agent("start 3 1 5\nmove 1 2 3 4 yourmove\n", ParsePolicy::Strict);
        let summary = agent.run().unwrap();
        assert_eq!(summary.rounds_observed, 1);
        assert_eq!(summary.moves_sent, 1);
        let lines = output_lines(agent);
        assert_eq!(lines.len(), 2);
        let mv: u64 = lines[1].parse().unwrap();
        assert!((1..=5).contains(&mv));
    }

    #[test]
    fn run_counts_everything() {
        let mut agent = agent(
            "start 2 0 3 4\nyourmove\nmove 1 1 2\nyourmove\nmove 2 3 2\n",
            ParsePolicy::Lenient,
        );
        let summary = agent.run().unwrap();
        assert_eq!(
            summary,
            RunSummary {
                commands: 6,
                sessions: 1,
                moves_sent: 2,
                rounds_observed: 2,
                ignored: 1,
            }
        );
    }

    #[test]
    fn new_start_overwrites_session() {
        let mut agent = agent("start 4 1 6 start 2 0 3", ParsePolicy::Strict);
        agent.run().unwrap();
        assert_eq!(agent.session(), Session::new(2, 3));
    }

    #[test]
    fn lenient_move_before_start_answers_one() {
        let mut agent = agent("yourmove", ParsePolicy::Lenient);
        agent.run().unwrap();
        assert_eq!(output_lines(agent), vec!["ready", "1"]);
    }

    #[test]
    fn strict_move_before_start_is_a_violation() {
        let mut agent = agent("yourmove", ParsePolicy::Strict);
        let err = agent.run().expect_err("no session");
        assert!(err.is_protocol_violation());
        assert_eq!(output_lines(agent), vec!["ready"]);
    }

    #[test]
    fn truncated_move_broadcast() {
        let mut lenient = agent("start 3 0 5 move 1 2", ParsePolicy::Lenient);
        assert!(lenient.run().is_ok());

        let mut strict = agent("start 3 0 5 move 1 2", ParsePolicy::Strict);
        let err = strict.run().expect_err("truncated");
        assert!(err.to_string().contains("expected 4 values"));
    }
}
