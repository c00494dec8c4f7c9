// LogSieve - core/demux.rs
//
// Single-pass line demultiplexer: every non-blank input line is evaluated
// against every predicate and written to the sink of each one it matches,
// plus an optional pass-through sink.
//
// Memory: one reusable line buffer, capped at MAX_LINE_BYTES. Nothing here
// grows with input size; any buffering belongs to the sinks.
//
// Resource rule: every sink handed to `run` is closed exactly once before
// `run` returns, on success and on every error path.

use crate::core::filter_set::PredicateSet;
use crate::core::predicate::Predicate;
use crate::util::constants;
use crate::util::error::DemuxError;
use crate::util::logging;
use std::borrow::Cow;
use std::collections::HashMap;
use std::io::{self, BufRead, Read};

/// Name reported for the pass-through sink in errors and logs.
pub const PASSTHROUGH_SINK_NAME: &str = "<original>";

/// Append-only line target (an output file or an in-memory display buffer).
pub trait LineSink {
    /// Append one canonical line (no terminator).
    fn write_line(&mut self, line: &str) -> io::Result<()>;

    /// Flush and release the sink. Must tolerate being called on an
    /// already-closed sink.
    fn close(&mut self) -> io::Result<()>;
}

/// Counters for one streaming pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DemuxStats {
    /// Lines read from the input, blank ones included.
    pub lines_read: u64,
    /// Empty or whitespace-only lines that were skipped.
    pub blank_lines: u64,
    /// Lines that contained invalid UTF-8 and were repaired.
    pub repaired_lines: u64,
    /// Total writes to predicate sinks (a line matching two filters counts twice).
    pub lines_routed: u64,
}

struct Route<'p, 's, S> {
    index: usize,
    predicate: &'p Predicate,
    name: &'s str,
    sink: &'s mut S,
}

/// Stream `input` through `predicates` into `sinks` (keyed by predicate
/// name) and the optional pass-through sink.
///
/// Every predicate must have exactly one sink and every sink must belong to a
/// predicate; this is checked before the first line is read. Whatever the
/// outcome, all sinks are closed before returning. Output already written is
/// not rolled back on failure.
pub fn run<R, S>(
    input: R,
    predicates: &PredicateSet,
    sinks: &mut HashMap<String, S>,
    passthrough: Option<&mut S>,
) -> Result<DemuxStats, DemuxError>
where
    R: BufRead,
    S: LineSink,
{
    run_with_line_limit(input, predicates, sinks, passthrough, constants::MAX_LINE_BYTES)
}

fn run_with_line_limit<R, S>(
    mut input: R,
    predicates: &PredicateSet,
    sinks: &mut HashMap<String, S>,
    mut passthrough: Option<&mut S>,
    max_line_bytes: usize,
) -> Result<DemuxStats, DemuxError>
where
    R: BufRead,
    S: LineSink,
{
    let result = match bind_routes(predicates, sinks) {
        Ok(mut routes) => stream(
            &mut input,
            &mut routes,
            passthrough.as_deref_mut(),
            max_line_bytes,
        ),
        Err(e) => Err(e),
    };

    let closed = close_all(sinks, passthrough);

    match (result, closed) {
        (Ok(stats), Ok(())) => {
            tracing::debug!(
                lines = stats.lines_read,
                blank = stats.blank_lines,
                repaired = stats.repaired_lines,
                routed = stats.lines_routed,
                "Demultiplex pass complete"
            );
            Ok(stats)
        }
        (Ok(_), Err(close_err)) => Err(close_err),
        (Err(e), Err(close_err)) => {
            tracing::warn!(error = %close_err, "Output close also failed after stream error");
            Err(e)
        }
        (Err(e), Ok(())) => Err(e),
    }
}

/// Pair each sink with its predicate, ordered as the predicate set is.
fn bind_routes<'p, 's, S>(
    predicates: &'p PredicateSet,
    sinks: &'s mut HashMap<String, S>,
) -> Result<Vec<Route<'p, 's, S>>, DemuxError> {
    if let Some(name) = predicates.names().find(|n| !sinks.contains_key(*n)) {
        return Err(DemuxError::MissingSink {
            name: name.to_string(),
        });
    }

    let mut routes = Vec::with_capacity(sinks.len());
    for (name, sink) in sinks.iter_mut() {
        let (index, predicate) = predicates
            .iter()
            .enumerate()
            .find(|(_, p)| p.name() == name)
            .ok_or_else(|| DemuxError::UnknownSink { name: name.clone() })?;
        routes.push(Route {
            index,
            predicate,
            name: name.as_str(),
            sink,
        });
    }
    routes.sort_by_key(|r| r.index);
    Ok(routes)
}

fn stream<R, S>(
    input: &mut R,
    routes: &mut [Route<'_, '_, S>],
    mut passthrough: Option<&mut S>,
    max_line_bytes: usize,
) -> Result<DemuxStats, DemuxError>
where
    R: BufRead,
    S: LineSink,
{
    let mut stats = DemuxStats::default();
    let mut raw = Vec::with_capacity(256);
    // One byte past the limit distinguishes "exactly at the limit" from "over".
    let limit = max_line_bytes as u64 + 1;

    loop {
        raw.clear();
        let read = input
            .by_ref()
            .take(limit)
            .read_until(b'\n', &mut raw)
            .map_err(|e| DemuxError::InputRead {
                line_number: stats.lines_read + 1,
                source: e,
            })?;
        if read == 0 {
            break;
        }
        stats.lines_read += 1;
        if raw.len() > max_line_bytes && !raw.ends_with(b"\n") {
            return Err(DemuxError::LineTooLong {
                line_number: stats.lines_read,
                max_bytes: max_line_bytes,
            });
        }

        let decoded = String::from_utf8_lossy(&raw);
        let line = strip_terminator(&decoded);
        if let Cow::Owned(_) = decoded {
            stats.repaired_lines += 1;
            tracing::debug!(
                line_number = stats.lines_read,
                preview = logging::preview(line),
                "Replaced invalid UTF-8 in input line"
            );
        }

        if line.trim().is_empty() {
            stats.blank_lines += 1;
            continue;
        }

        if let Some(sink) = passthrough.as_deref_mut() {
            sink.write_line(line).map_err(|e| DemuxError::SinkWrite {
                sink: PASSTHROUGH_SINK_NAME.to_string(),
                source: e,
            })?;
        }

        for route in routes.iter_mut() {
            if route.predicate.matches(line) {
                route.sink.write_line(line).map_err(|e| DemuxError::SinkWrite {
                    sink: route.name.to_string(),
                    source: e,
                })?;
                stats.lines_routed += 1;
            }
        }
    }

    if stats.lines_read > 0 && stats.lines_routed == 0 {
        tracing::debug!("No input line matched any filter");
    }

    Ok(stats)
}

/// Remove one trailing `\n` or `\r\n`. Other whitespace is kept.
pub fn strip_terminator(line: &str) -> &str {
    match line.strip_suffix('\n') {
        Some(rest) => rest.strip_suffix('\r').unwrap_or(rest),
        None => line,
    }
}

/// Close every sink once, reporting the first failure.
fn close_all<S: LineSink>(
    sinks: &mut HashMap<String, S>,
    passthrough: Option<&mut S>,
) -> Result<(), DemuxError> {
    let mut first_err = None;

    let named = sinks.iter_mut().map(|(name, sink)| (name.as_str(), sink));
    let all = named.chain(passthrough.map(|sink| (PASSTHROUGH_SINK_NAME, sink)));

    for (name, sink) in all {
        if let Err(e) = sink.close() {
            tracing::warn!(sink = name, error = %e, "Failed to close output");
            if first_err.is_none() {
                first_err = Some(DemuxError::SinkWrite {
                    sink: name.to_string(),
                    source: e,
                });
            }
        }
    }

    match first_err {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::predicate::{MatchMode, TermSpec};
    use std::io::{BufReader, Cursor};

    /// Reader whose every read fails.
    struct BrokenRead;

    impl Read for BrokenRead {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "device gone"))
        }
    }

    /// Sink that records lines and close calls; optionally fails on the Nth write.
    #[derive(Debug, Default)]
    struct RecordingSink {
        lines: Vec<String>,
        closes: usize,
        fail_on_write: Option<usize>,
        fail_on_close: bool,
    }

    impl LineSink for RecordingSink {
        fn write_line(&mut self, line: &str) -> io::Result<()> {
            if self.fail_on_write == Some(self.lines.len()) {
                return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
            }
            self.lines.push(line.to_string());
            Ok(())
        }

        fn close(&mut self) -> io::Result<()> {
            self.closes += 1;
            if self.fail_on_close {
                return Err(io::Error::new(io::ErrorKind::Other, "flush failed"));
            }
            Ok(())
        }
    }

    fn pred(name: &str, specs: &[TermSpec], mode: MatchMode) -> Predicate {
        Predicate::new(name, specs, mode).unwrap()
    }

    fn set(predicates: Vec<Predicate>) -> PredicateSet {
        PredicateSet::new(predicates, &[]).unwrap()
    }

    fn sinks_for(set: &PredicateSet) -> HashMap<String, RecordingSink> {
        set.names()
            .map(|n| (n.to_string(), RecordingSink::default()))
            .collect()
    }

    #[test]
    fn test_errors_scenario_with_passthrough() {
        let set = set(vec![pred("errors", &[TermSpec::literal("ERROR")], MatchMode::All)]);
        let mut sinks = sinks_for(&set);
        let mut original = RecordingSink::default();

        let input = "ERROR disk full\n\nINFO ok\nERROR net down\n";
        let stats = run(Cursor::new(input), &set, &mut sinks, Some(&mut original)).unwrap();

        assert_eq!(sinks["errors"].lines, vec!["ERROR disk full", "ERROR net down"]);
        assert_eq!(original.lines, vec!["ERROR disk full", "INFO ok", "ERROR net down"]);
        assert_eq!(stats.lines_read, 4);
        assert_eq!(stats.blank_lines, 1);
        assert_eq!(stats.lines_routed, 2);
    }

    #[test]
    fn test_pattern_scenario() {
        let set = set(vec![pred("versions", &[TermSpec::pattern(r"\d+\.\d+")], MatchMode::All)]);
        let mut sinks = sinks_for(&set);

        let input = "v1.2 release\nno version here\nv10.5 hotfix";
        run(Cursor::new(input), &set, &mut sinks, None).unwrap();

        assert_eq!(sinks["versions"].lines, vec!["v1.2 release", "v10.5 hotfix"]);
    }

    #[test]
    fn test_whitespace_lines_reach_no_sink() {
        let set = set(vec![pred("all", &[], MatchMode::All)]);
        let mut sinks = sinks_for(&set);
        let mut original = RecordingSink::default();

        let input = "   \n\t\n\r\n \t \r\nreal\n";
        let stats = run(Cursor::new(input), &set, &mut sinks, Some(&mut original)).unwrap();

        assert_eq!(sinks["all"].lines, vec!["real"]);
        assert_eq!(original.lines, vec!["real"]);
        assert_eq!(stats.blank_lines, 4);
    }

    #[test]
    fn test_only_terminator_is_stripped() {
        let set = set(vec![pred("all", &[], MatchMode::All)]);
        let mut sinks = sinks_for(&set);

        let input = "  indented \r\n\ttabbed\t\nlast  ";
        run(Cursor::new(input), &set, &mut sinks, None).unwrap();

        assert_eq!(sinks["all"].lines, vec!["  indented ", "\ttabbed\t", "last  "]);
    }

    #[test]
    fn test_line_fans_out_to_every_matching_sink() {
        let set = set(vec![
            pred("disk", &[TermSpec::literal("disk")], MatchMode::All),
            pred("error", &[TermSpec::literal("ERROR")], MatchMode::All),
            pred("none", &[], MatchMode::Any),
        ]);
        let mut sinks = sinks_for(&set);

        let stats = run(Cursor::new("ERROR disk full\n"), &set, &mut sinks, None).unwrap();

        assert_eq!(sinks["disk"].lines, vec!["ERROR disk full"]);
        assert_eq!(sinks["error"].lines, vec!["ERROR disk full"]);
        assert!(sinks["none"].lines.is_empty());
        assert_eq!(stats.lines_routed, 2);
    }

    #[test]
    fn test_order_and_completeness() {
        let specs = [TermSpec::literal("a"), TermSpec::pattern("[0-9]")];
        let set = set(vec![
            pred("both", &specs, MatchMode::All),
            pred("either", &specs, MatchMode::Any),
        ]);
        let mut sinks = sinks_for(&set);

        let lines = ["a1", "b2", "", "ccc", "a", "9a", "  ", "zz7", "aaa"];
        let input = lines.join("\n");
        run(Cursor::new(input), &set, &mut sinks, None).unwrap();

        for predicate in &set {
            let expected: Vec<&str> = lines
                .iter()
                .copied()
                .filter(|l| !l.trim().is_empty() && predicate.matches(l))
                .collect();
            assert_eq!(sinks[predicate.name()].lines, expected, "{}", predicate.name());
        }
    }

    #[test]
    fn test_invalid_utf8_is_repaired() {
        let set = set(vec![pred("all", &[], MatchMode::All)]);
        let mut sinks = sinks_for(&set);

        let input: &[u8] = b"ok\nbad \xff byte\nafter\n";
        let stats = run(Cursor::new(input), &set, &mut sinks, None).unwrap();

        assert_eq!(sinks["all"].lines, vec!["ok", "bad \u{fffd} byte", "after"]);
        assert_eq!(stats.repaired_lines, 1);
    }

    #[test]
    fn test_write_failure_closes_every_sink() {
        let set = set(vec![
            pred("first", &[], MatchMode::All),
            pred("second", &[], MatchMode::All),
        ]);
        let mut sinks = sinks_for(&set);
        sinks.get_mut("second").unwrap().fail_on_write = Some(1);
        let mut original = RecordingSink::default();

        let result = run(
            Cursor::new("one\ntwo\nthree\n"),
            &set,
            &mut sinks,
            Some(&mut original),
        );

        match result {
            Err(DemuxError::SinkWrite { sink, .. }) => assert_eq!(sink, "second"),
            other => panic!("expected SinkWrite, got {other:?}"),
        }
        // Partial output stays; nothing past the failing line is written.
        assert_eq!(sinks["first"].lines, vec!["one", "two"]);
        assert_eq!(sinks["second"].lines, vec!["one"]);
        assert_eq!(original.lines, vec!["one", "two"]);
        for sink in sinks.values() {
            assert_eq!(sink.closes, 1);
        }
        assert_eq!(original.closes, 1);
    }

    #[test]
    fn test_success_closes_every_sink_once() {
        let set = set(vec![pred("a", &[], MatchMode::All), pred("b", &[], MatchMode::Any)]);
        let mut sinks = sinks_for(&set);
        let mut original = RecordingSink::default();

        run(Cursor::new("x\n"), &set, &mut sinks, Some(&mut original)).unwrap();

        assert!(sinks.values().all(|s| s.closes == 1));
        assert_eq!(original.closes, 1);
    }

    #[test]
    fn test_close_failure_is_reported() {
        let set = set(vec![pred("a", &[], MatchMode::All)]);
        let mut sinks = sinks_for(&set);
        sinks.get_mut("a").unwrap().fail_on_close = true;

        let result = run(Cursor::new("x\n"), &set, &mut sinks, None);
        assert!(matches!(result, Err(DemuxError::SinkWrite { .. })));
        assert_eq!(sinks["a"].lines, vec!["x"]);
    }

    #[test]
    fn test_close_failure_still_closes_the_rest() {
        let set = set(vec![pred("a", &[], MatchMode::All), pred("b", &[], MatchMode::All)]);
        let mut sinks = sinks_for(&set);
        sinks.get_mut("a").unwrap().fail_on_close = true;
        let mut original = RecordingSink::default();

        let result = run(Cursor::new("x\n"), &set, &mut sinks, Some(&mut original));

        assert!(matches!(result, Err(DemuxError::SinkWrite { ref sink, .. }) if sink == "a"));
        assert_eq!(sinks["a"].closes, 1);
        assert_eq!(sinks["b"].closes, 1);
        assert_eq!(original.closes, 1);
        assert_eq!(sinks["b"].lines, vec!["x"]);
    }

    #[test]
    fn test_read_failure_closes_every_sink() {
        let set = set(vec![pred("a", &[], MatchMode::All), pred("b", &[], MatchMode::Any)]);
        let mut sinks = sinks_for(&set);
        let mut original = RecordingSink::default();
        let input = BufReader::new(Cursor::new("first\n").chain(BrokenRead));

        let result = run(input, &set, &mut sinks, Some(&mut original));

        assert!(
            matches!(result, Err(DemuxError::InputRead { line_number: 2, .. })),
            "expected InputRead at line 2, got {result:?}"
        );
        assert_eq!(sinks["a"].lines, vec!["first"]);
        assert_eq!(original.lines, vec!["first"]);
        assert!(sinks.values().all(|s| s.closes == 1));
        assert_eq!(original.closes, 1);
    }

    #[test]
    fn test_overlong_line_aborts_and_closes() {
        let set = set(vec![pred("a", &[], MatchMode::All)]);
        let mut sinks = sinks_for(&set);
        let mut original = RecordingSink::default();

        let input = "12345678\n123456789 too long\nnever\n";
        let result = run_with_line_limit(
            Cursor::new(input),
            &set,
            &mut sinks,
            Some(&mut original),
            8,
        );

        assert!(
            matches!(
                result,
                Err(DemuxError::LineTooLong {
                    line_number: 2,
                    max_bytes: 8
                })
            ),
            "got {result:?}"
        );
        // A line of exactly the limit is accepted.
        assert_eq!(sinks["a"].lines, vec!["12345678"]);
        assert_eq!(sinks["a"].closes, 1);
        assert_eq!(original.closes, 1);
    }

    #[test]
    fn test_missing_sink_rejected_before_reading() {
        let set = set(vec![pred("a", &[], MatchMode::All), pred("b", &[], MatchMode::All)]);
        let mut sinks: HashMap<String, RecordingSink> =
            [("a".to_string(), RecordingSink::default())].into_iter().collect();

        let result = run(Cursor::new("x\n"), &set, &mut sinks, None);

        assert!(matches!(result, Err(DemuxError::MissingSink { ref name }) if name == "b"));
        assert!(sinks["a"].lines.is_empty());
        assert_eq!(sinks["a"].closes, 1);
    }

    #[test]
    fn test_unknown_sink_rejected() {
        let set = set(vec![pred("a", &[], MatchMode::All)]);
        let mut sinks = sinks_for(&set);
        sinks.insert("stray".to_string(), RecordingSink::default());

        let result = run(Cursor::new("x\n"), &set, &mut sinks, None);

        assert!(matches!(result, Err(DemuxError::UnknownSink { ref name }) if name == "stray"));
        assert!(sinks.values().all(|s| s.closes == 1 && s.lines.is_empty()));
    }

    #[test]
    fn test_empty_input() {
        let set = set(vec![pred("a", &[], MatchMode::All)]);
        let mut sinks = sinks_for(&set);

        let stats = run(Cursor::new(""), &set, &mut sinks, None).unwrap();

        assert_eq!(stats, DemuxStats::default());
        assert_eq!(sinks["a"].closes, 1);
    }

    #[test]
    fn test_strip_terminator() {
        assert_eq!(strip_terminator("a\n"), "a");
        assert_eq!(strip_terminator("a\r\n"), "a");
        assert_eq!(strip_terminator("a \n"), "a ");
        assert_eq!(strip_terminator("a\n\n"), "a\n");
        assert_eq!(strip_terminator("a"), "a");
    }
}
