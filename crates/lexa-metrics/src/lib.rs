pub mod accumulate;
pub mod calculator;
pub mod entropy;
pub mod extract;
pub mod mtld;
pub mod pipeline;
pub mod result;
pub mod tokenize;
pub mod ttr;
pub mod worker;

pub use calculator::{Calculator, MetricKind};
pub use mtld::{Mtld, MtldScore, DEFAULT_THRESHOLD};
pub use result::*;
pub use worker::{EngineConfig, MetricsEngine};
