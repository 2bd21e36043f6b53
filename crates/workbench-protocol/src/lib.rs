//! Shared data contracts of the workbench: the persisted scenario layout and
//! the analysis payload consumed by module mappers.

pub mod payload;
pub mod scenario;

pub use payload::{
    DataStore, FeatureImportance, FeatureImportanceData, ModelCard, PcpAxis, PcpData,
    PcpDataPoint, ResidualPoint, Residuals, SectionError, Sobol, SobolIndex,
};
pub use scenario::{
    Parameters, PartialScenario, PcpSelections, PinnedRef, Scenario, ScenarioMap, SelectionRange,
};
