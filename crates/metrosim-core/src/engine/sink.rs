use super::error::EngineError;
use super::state::RunSummary;
use crate::core::models::system::SimulationBox;

/// Receives periodic checkpoints and the final report of a run.
///
/// Failures are reported back to the driver, which logs them and keeps running.
pub trait ReportSink {
    fn checkpoint(&mut self, step: usize, sim_box: &SimulationBox) -> Result<(), EngineError>;

    fn finish(&mut self, summary: &RunSummary, sim_box: &SimulationBox) -> Result<(), EngineError>;
}

/// A sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ReportSink for NullSink {
    fn checkpoint(&mut self, _step: usize, _sim_box: &SimulationBox) -> Result<(), EngineError> {
        Ok(())
    }

    fn finish(&mut self, _summary: &RunSummary, _sim_box: &SimulationBox) -> Result<(), EngineError> {
        Ok(())
    }
}
