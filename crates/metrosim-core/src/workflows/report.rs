use crate::engine::state::RunSummary;
use chrono::{DateTime, Local};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

const HEADER: &str = "######### metrosim Results File #############";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The end-of-run results file: an `[Information]` section describing the run and a
/// `[Results]` section with energies, timing and acceptance statistics.
#[derive(Debug, Clone)]
pub struct ResultsReport<'a> {
    pub summary: &'a RunSummary,
    pub name: Option<&'a str>,
    pub timestamp: DateTime<Local>,
}

impl<'a> ResultsReport<'a> {
    pub fn new(summary: &'a RunSummary, name: Option<&'a str>) -> Self {
        Self {
            summary,
            name,
            timestamp: Local::now(),
        }
    }

    pub fn write_to(&self, writer: &mut impl Write) -> io::Result<()> {
        let s = self.summary;
        writeln!(writer, "{}", HEADER)?;
        writeln!(writer, "[Information]")?;
        writeln!(writer, "Timestamp = {}", self.timestamp.format(TIMESTAMP_FORMAT))?;
        if let Some(name) = self.name {
            writeln!(writer, "Simulation-Name = {}", name)?;
        }
        writeln!(writer, "Simulation-Mode = {}", s.backend.label())?;
        writeln!(writer, "Starting-Step = {}", s.step_start)?;
        writeln!(writer, "Steps = {}", s.steps)?;
        writeln!(writer, "Molecule-Count = {}", s.molecule_count)?;
        writeln!(writer)?;
        writeln!(writer, "[Results]")?;
        writeln!(writer, "Final-Energy = {}", s.final_energy)?;
        writeln!(writer, "Run-Time = {:.3} seconds", s.run_time.as_secs_f64())?;
        writeln!(writer, "Accepted-Moves = {}", s.accepted)?;
        writeln!(writer, "Rejected-Moves = {}", s.rejected)?;
        let rate = (s.acceptance_rate() * 100.0).round() / 100.0;
        writeln!(writer, "Acceptance-Rate = {}%", rate)?;
        Ok(())
    }

    pub fn write_to_path<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::evaluator::Backend;
    use chrono::TimeZone;
    use std::time::Duration;

    fn summary(backend: Backend) -> RunSummary {
        RunSummary {
            backend,
            step_start: 0,
            steps: 1000,
            molecule_count: 5,
            initial_energy: -10.0,
            final_energy: -12.345,
            accepted: 600,
            rejected: 400,
            run_time: Duration::from_millis(123),
        }
    }

    fn render(report: &ResultsReport) -> String {
        let mut buffer = Vec::new();
        report.write_to(&mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn writes_information_and_results_sections() {
        let summary = summary(Backend::Sequential);
        let report = ResultsReport {
            summary: &summary,
            name: Some("water"),
            timestamp: Local.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap(),
        };

        let expected = "\
######### metrosim Results File #############
[Information]
Timestamp = 2026-01-01 12:00:00
Simulation-Name = water
Simulation-Mode = CPU
Starting-Step = 0
Steps = 1000
Molecule-Count = 5

[Results]
Final-Energy = -12.345
Run-Time = 0.123 seconds
Accepted-Moves = 600
Rejected-Moves = 400
Acceptance-Rate = 60%
";
        assert_eq!(render(&report), expected);
    }

    #[test]
    fn omits_name_when_unnamed_and_labels_parallel_runs() {
        let mut summary = summary(Backend::Parallel);
        summary.accepted = 2;
        summary.rejected = 1;
        let text = render(&ResultsReport::new(&summary, None));

        assert!(!text.contains("Simulation-Name"));
        assert!(text.contains("Simulation-Mode = Parallel\n"));
        assert!(text.contains("Acceptance-Rate = 66.67%\n"));
    }

    #[test]
    fn writes_to_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.results");
        let summary = summary(Backend::Sequential);
        ResultsReport::new(&summary, None).write_to_path(&path).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().starts_with(HEADER));
    }
}
