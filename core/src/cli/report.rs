use crate::api::PipelineStats;
use crate::types::Report;
use std::fmt;

/// Text report formatter for normalized lab results
pub struct TextReport<'a> {
    report: &'a Report,
    stats: Option<&'a PipelineStats>,
}

impl<'a> TextReport<'a> {
    /// Creates a new text report
    pub fn new(report: &'a Report) -> Self {
        Self {
            report,
            stats: None,
        }
    }

    /// Builder: Append pipeline counters to the output
    pub fn with_stats(mut self, stats: &'a PipelineStats) -> Self {
        self.stats = Some(stats);
        self
    }
}

impl<'a> fmt::Display for TextReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Lab Report")?;
        writeln!(f, "==========")?;
        writeln!(f)?;

        if self.report.is_empty() {
            writeln!(f, "No recognized tests")?;
        }

        for (category, test) in self.report.iter() {
            writeln!(f, "{}", category)?;
            writeln!(f, "  Result:          {}", test.result)?;
            writeln!(
                f,
                "  Unit:            {}",
                test.unit.as_deref().unwrap_or("-")
            )?;
            match &test.reference_range {
                Some(range) => writeln!(f, "  Reference Range: {}", range)?,
                None => writeln!(f, "  Reference Range: -")?,
            }
        }

        writeln!(f)?;
        writeln!(f, "Tests: {}", self.report.len())?;

        if let Some(stats) = self.stats {
            writeln!(f)?;
            writeln!(f, "{}", stats)?;
        }

        Ok(())
    }
}
