//! Dose-averaged LET accumulation
#![doc = include_str!("../readme.md")]

mod accumulator;
mod builder;
mod config;
mod error;
mod parallel;
mod sample;
mod stats;

#[doc(inline)]
pub use accumulator::{AccumulatorState, LetAccumulator, StepOutcome, ELEMENTARY_CHARGE};

#[doc(inline)]
pub use builder::LetConfigBuilder;

#[doc(inline)]
pub use config::{LetConfig, LookupFailurePolicy};

#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use parallel::accumulate_parallel;

#[doc(inline)]
pub use sample::StepSample;

#[doc(inline)]
pub use stats::AccumulatorStats;
