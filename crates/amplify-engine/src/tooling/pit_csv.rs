//! Reader for PIT's `mutations.csv` report.
//!
//! One mutant per line:
//!
//! ```text
//! Calc.java,com.acme.Calc,org.pitest...MathMutator,add,12,KILLED,com.acme.CalcTest.testAdd(com.acme.CalcTest)
//! ```
//!
//! The killing-test column is `none`, `method(Suite)`, `Suite.method(Suite)`,
//! or the JUnit 5 unique-id form `Suite.[engine:..]/[class:Suite]/[method:m()]`.

use std::path::{Path, PathBuf};

use amplify_core::constants::MUTATIONS_CSV;
use amplify_core::errors::MutationReportError;
use amplify_core::{MutantId, MutantOutcome, MutantState, TestId};

/// Parse a whole report. Blank lines are skipped; anything else that does
/// not parse is an error naming its 1-based line number.
pub fn parse_mutations_csv(content: &str) -> Result<Vec<MutantOutcome>, MutationReportError> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| parse_line(line, i + 1))
        .collect()
}

pub fn load_mutations_csv(path: &Path) -> Result<Vec<MutantOutcome>, MutationReportError> {
    let content = std::fs::read_to_string(path).map_err(|source| MutationReportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_mutations_csv(&content)
}

/// Locate the report under `dir`: `dir/mutations.csv` itself, or the one in
/// the most recently modified sub-directory (PIT writes timestamped dirs).
pub fn find_mutations_csv(dir: &Path) -> Result<PathBuf, MutationReportError> {
    let direct = dir.join(MUTATIONS_CSV);
    if direct.is_file() {
        return Ok(direct);
    }
    let missing = || MutationReportError::Missing {
        path: dir.display().to_string(),
    };
    let entries = std::fs::read_dir(dir).map_err(|_| missing())?;
    entries
        .filter_map(Result::ok)
        .map(|e| e.path().join(MUTATIONS_CSV))
        .filter(|p| p.is_file())
        .max_by_key(|p| p.metadata().and_then(|m| m.modified()).ok())
        .ok_or_else(missing)
}

fn parse_line(line: &str, line_no: usize) -> Result<MutantOutcome, MutationReportError> {
    let malformed = |message: String| MutationReportError::Malformed {
        line: line_no,
        message,
    };
    // The killing test may itself contain commas (parameterized names).
    let fields: Vec<&str> = line.splitn(7, ',').map(str::trim).collect();
    if fields.len() < 6 {
        return Err(malformed(format!(
            "expected at least 6 fields, found {}",
            fields.len()
        )));
    }
    let line_number: u32 = fields[4]
        .parse()
        .map_err(|_| malformed(format!("invalid line number `{}`", fields[4])))?;
    let state: MutantState = fields[5].parse().map_err(malformed)?;
    let killing_test = fields.get(6).and_then(|raw| parse_killing_test(raw));

    Ok(MutantOutcome::new(
        MutantId::new(fields[2], fields[1], fields[3], line_number),
        state,
        killing_test,
    ))
}

/// Resolve PIT's description of the killing test to a test identity.
pub fn parse_killing_test(raw: &str) -> Option<TestId> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("none") {
        return None;
    }

    // JUnit 5: ...[class:com.acme.CalcTest]/[method:testAdd()]
    if let Some(method) = bracket_value(raw, "[method:") {
        let suite = bracket_value(raw, "[class:").unwrap_or_default();
        let method = method.split('(').next().unwrap_or(method);
        return (!method.is_empty()).then(|| TestId::new(suite, method));
    }

    // JUnit 4: [com.acme.CalcTest.]testAdd(com.acme.CalcTest)
    if let Some((head, tail)) = raw.split_once('(') {
        let suite = tail.trim_end_matches(')');
        let method = head
            .strip_prefix(suite)
            .and_then(|m| m.strip_prefix('.'))
            .unwrap_or_else(|| head.rsplit('.').next().unwrap_or(head));
        return (!method.is_empty()).then(|| TestId::new(suite, method));
    }

    // Fallback: qualified.Suite.method
    let (suite, method) = raw.rsplit_once('.')?;
    (!method.is_empty()).then(|| TestId::new(suite, method))
}

fn bracket_value<'a>(raw: &'a str, tag: &str) -> Option<&'a str> {
    let start = raw.find(tag)? + tag.len();
    let len = raw[start..].find(']')?;
    Some(&raw[start..start + len])
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Calc.java,com.acme.Calc,org.pitest.mutationtest.engine.gregor.mutators.MathMutator,add,12,KILLED,com.acme.CalcTest.testAdd(com.acme.CalcTest)
Calc.java,com.acme.Calc,org.pitest.mutationtest.engine.gregor.mutators.ReturnValsMutator,sub,20,SURVIVED,none

Calc.java,com.acme.Calc,org.pitest.mutationtest.engine.gregor.mutators.MathMutator,div,31,TIMED_OUT,none
";

    #[test]
    fn parses_sample_report() {
        let outcomes = parse_mutations_csv(SAMPLE).unwrap();
        assert_eq!(outcomes.len(), 3);

        let first = &outcomes[0];
        assert_eq!(first.state, MutantState::Killed);
        assert_eq!(first.mutant.class, "com.acme.Calc");
        assert_eq!(first.mutant.location, "add");
        assert_eq!(first.line(), 12);
        assert_eq!(
            first.killing_test,
            Some(TestId::new("com.acme.CalcTest", "testAdd"))
        );
        assert_eq!(outcomes[1].killing_test, None);
        assert_eq!(outcomes[2].state, MutantState::TimedOut);
    }

    #[test]
    fn malformed_lines_carry_their_number() {
        let content = "a,b,c,d,12,KILLED,none\na,b,c,d,twelve,KILLED,none\n";
        match parse_mutations_csv(content) {
            Err(MutationReportError::Malformed { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected: {other:?}"),
        }
        assert!(parse_mutations_csv("a,b,c\n").is_err());
        assert!(parse_mutations_csv("a,b,c,d,1,EXPLODED,none\n").is_err());
    }

    #[test]
    fn killing_test_forms() {
        let expected = Some(TestId::new("com.acme.CalcTest", "testAdd"));
        assert_eq!(parse_killing_test("testAdd(com.acme.CalcTest)"), expected);
        assert_eq!(
            parse_killing_test("com.acme.CalcTest.testAdd(com.acme.CalcTest)"),
            expected
        );
        assert_eq!(
            parse_killing_test(
                "com.acme.CalcTest.[engine:junit-jupiter]/[class:com.acme.CalcTest]/[method:testAdd()]"
            ),
            expected
        );
        assert_eq!(parse_killing_test("com.acme.CalcTest.testAdd"), expected);
        assert_eq!(parse_killing_test("none"), None);
        assert_eq!(parse_killing_test(""), None);
    }

    #[test]
    fn finds_newest_report_in_timestamped_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let old = dir.path().join("201901010000");
        std::fs::create_dir_all(&old).unwrap();
        std::fs::write(old.join(MUTATIONS_CSV), SAMPLE).unwrap();

        let found = find_mutations_csv(dir.path()).unwrap();
        assert_eq!(found, old.join(MUTATIONS_CSV));
        assert_eq!(load_mutations_csv(&found).unwrap().len(), 3);

        let empty = tempfile::tempdir().unwrap();
        assert!(matches!(
            find_mutations_csv(empty.path()),
            Err(MutationReportError::Missing { .. })
        ));
    }
}
