pub mod analysis;
pub mod config;
pub mod control;
pub mod line;
pub mod metrics;
pub mod pipeline;
pub mod pool;
pub mod sheet;
pub mod testing;

pub use analysis::{check_sheet, MaxRectAnalyzer, SheetAnalyzer};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, ControlConfig,
    LineConfig, OutputConfig,
};
pub use control::{ControlError, ControlStatus, QualityControl};
pub use line::{ProductionLine, QueueLine};
pub use pipeline::{LinePipeline, LineState, LineStatus, PipelineError, ReorderBuffer};
pub use pool::{PoolError, PoolStatus, WorkerPool};
pub use sheet::{Query, Sheet, SheetError, ThicknessGrid, ThicknessRange};
